//! The build request: everything one invocation of ktransw was asked to do.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Extension of Karel sources; ktrans only considers files ending in this.
pub const KL_SUFFIX: &str = ".kl";

/// Extension of translated p-code artifacts.
pub const PCODE_SUFFIX: &str = ".pc";

/// What the invocation should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Run the preprocessor and translator
    #[default]
    Compile,
    /// Only write a Make dependency rule for the source
    DependencyOnly,
}

/// Output verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only
    Quiet,
    #[default]
    Normal,
    /// --verbose: show translator output even on success
    Verbose,
}

/// Ordered include search directories. The first directory containing a
/// header wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPathList {
    dirs: Vec<PathBuf>,
}

impl SearchPathList {
    /// Create a search path list, making every entry absolute.
    ///
    /// Symlinks are not resolved, so the paths reported in dependency rules
    /// are the ones the user gave.
    pub fn new<I, P>(dirs: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let dirs = dirs
            .into_iter()
            .map(|d| crate::util::fs::absolute(d.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(SearchPathList { dirs })
    }

    /// Create a search path list without touching the paths.
    pub fn from_absolute(dirs: Vec<PathBuf>) -> Self {
        SearchPathList { dirs }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

/// A single build, created once from the command line and never mutated
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    /// Arguments for the translator, with file arguments made absolute
    pub translator_args: Vec<String>,

    /// First Karel source among the translator arguments
    pub source_file: Option<PathBuf>,

    /// Include search directories
    pub include_dirs: SearchPathList,

    pub mode: BuildMode,

    /// Leave system headers out of the dependency rule (-MM)
    pub ignore_system_headers: bool,

    /// Keep headers that cannot be found, assuming they are generated (-MG)
    pub tolerate_missing_headers: bool,

    /// Emit an empty rule for every dependency (-MP)
    pub emit_phony_targets: bool,

    /// Rule target override (-MT)
    pub explicit_target: Option<String>,

    /// Dependency file path (-MF); stdout when unset
    pub explicit_dep_file: Option<PathBuf>,

    /// Check parameters only
    pub dry_run: bool,

    pub verbosity: Verbosity,
}

impl BuildRequest {
    /// Create a compile request from the arguments destined for the
    /// translator.
    ///
    /// ktrans options always start with a forward slash and core version
    /// identifiers with a `V`; everything else is a (possibly relative) path
    /// and is made absolute here.
    pub fn new<I, S>(translator_args: I, include_dirs: SearchPathList) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let translator_args = translator_args
            .into_iter()
            .map(|arg| absolutize_arg(arg.into()))
            .collect::<Result<Vec<_>>>()?;

        let source_file = translator_args
            .iter()
            .find(|arg| arg.ends_with(KL_SUFFIX))
            .map(PathBuf::from);

        Ok(BuildRequest {
            translator_args,
            source_file,
            include_dirs,
            ..Default::default()
        })
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn ignore_system_headers(mut self, ignore: bool) -> Self {
        self.ignore_system_headers = ignore;
        self
    }

    pub fn tolerate_missing_headers(mut self, tolerate: bool) -> Self {
        self.tolerate_missing_headers = tolerate;
        self
    }

    pub fn emit_phony_targets(mut self, emit: bool) -> Self {
        self.emit_phony_targets = emit;
        self
    }

    pub fn with_target(mut self, target: Option<String>) -> Self {
        self.explicit_target = target;
        self
    }

    pub fn with_dep_file(mut self, path: Option<PathBuf>) -> Self {
        self.explicit_dep_file = path;
        self
    }

    /// Whether a Karel source was found among the arguments.
    pub fn needs_build(&self) -> bool {
        self.source_file.is_some()
    }

    /// Target of the dependency rule: the explicit override, or the base
    /// name of the source with the p-code extension.
    pub fn dependency_target(&self) -> Option<String> {
        if let Some(ref target) = self.explicit_target {
            return Some(target.clone());
        }
        let stem = self.source_file.as_ref()?.file_stem()?;
        Some(format!("{}{}", stem.to_string_lossy(), PCODE_SUFFIX))
    }
}

/// Make a translator argument absolute unless it is an option or a core
/// version identifier. Karel sources are always paths, whatever letter
/// they start with.
fn absolutize_arg(arg: String) -> Result<String> {
    let is_path = arg.ends_with(KL_SUFFIX)
        || !matches!(arg.chars().next(), None | Some('/') | Some('V') | Some('v'));
    if !is_path {
        return Ok(arg);
    }

    let path = crate::util::fs::absolute(Path::new(&arg))
        .with_context(|| format!("failed to make `{}` absolute", arg))?;
    Ok(path.to_string_lossy().into_owned())
}
