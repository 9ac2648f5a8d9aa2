//! Scoped temporary build directory.
//!
//! gpp has to write its output to a real file that ktrans can then open, so
//! every compile gets a fresh directory under the system temp dir. The
//! directory and everything in it is removed when the [`BuildWorkspace`] is
//! released or dropped, whichever comes first, on success, early return and
//! unwinding alike.
//!
//! Removal is best-effort: a file that cannot be deleted is skipped and the
//! rest of the tree is still removed. Cleanup problems are logged at debug
//! level and never reported as the outcome of the build.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Prefix of workspace directory names.
pub const WORKSPACE_PREFIX: &str = "ktransw-";

/// Suffix of workspace directory names.
pub const WORKSPACE_SUFFIX: &str = "-buildd";

/// Filesystem removal primitives used during cleanup.
pub trait RemoveOps {
    fn remove_file(&mut self, path: &Path) -> io::Result<()>;
    fn remove_dir(&mut self, path: &Path) -> io::Result<()>;
}

/// Removes entries from the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl RemoveOps for FsRemover {
    fn remove_file(&mut self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir(&mut self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }
}

/// A temporary directory owned by exactly one build.
#[derive(Debug)]
pub struct BuildWorkspace<R: RemoveOps = FsRemover> {
    path: PathBuf,
    remover: R,
    released: bool,
}

impl BuildWorkspace<FsRemover> {
    /// Create a fresh, empty workspace in the system temp directory.
    pub fn acquire() -> Result<Self> {
        Self::acquire_with(FsRemover)
    }
}

impl<R: RemoveOps> BuildWorkspace<R> {
    /// Create a fresh workspace that is cleaned up through `remover`.
    pub fn acquire_with(remover: R) -> Result<Self> {
        Self::acquire_in(&std::env::temp_dir(), remover)
    }

    /// Create a fresh workspace under `parent`.
    pub fn acquire_in(parent: &Path, remover: R) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .suffix(WORKSPACE_SUFFIX)
            .tempdir_in(parent)
            .with_context(|| {
                format!("failed to create build directory in {}", parent.display())
            })?;

        // Cleanup is ours from here on; tempfile's own removal gives up at
        // the first error.
        let path = dir.keep();
        tracing::debug!("acquired build directory {}", path.display());

        Ok(BuildWorkspace {
            path,
            remover,
            released: false,
        })
    }

    /// Root of the workspace.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file with the same name as `file`, placed in the workspace.
    pub fn file_path(&self, file: &Path) -> PathBuf {
        match file.file_name() {
            Some(name) => self.path.join(name),
            None => self.path.join(file),
        }
    }

    /// Remove the workspace now rather than at end of scope.
    pub fn release(mut self) {
        self.cleanup();
    }

    fn cleanup(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let failures = remove_tree(&self.path, &mut self.remover);
        if failures > 0 {
            tracing::debug!(
                "{} entr{} left behind in {}",
                failures,
                if failures == 1 { "y" } else { "ies" },
                self.path.display()
            );
        }
    }
}

impl<R: RemoveOps> Drop for BuildWorkspace<R> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Remove `root` and everything below it, skipping entries that cannot be
/// removed. Symlinks are removed, not followed.
///
/// Returns the number of entries that could not be removed.
pub fn remove_tree<R: RemoveOps + ?Sized>(root: &Path, remover: &mut R) -> usize {
    let mut failures = 0;

    for entry in WalkDir::new(root).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("skipping during cleanup: {}", e);
                failures += 1;
                continue;
            }
        };

        let result = if entry.file_type().is_dir() {
            remover.remove_dir(entry.path())
        } else {
            remover.remove_file(entry.path())
        };

        if let Err(e) = result {
            tracing::debug!("failed to remove {}: {}", entry.path().display(), e);
            failures += 1;
        }
    }

    failures
}
