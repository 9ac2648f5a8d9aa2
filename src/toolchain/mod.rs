//! The two external tools ktransw drives.
//!
//! Tool detection priority:
//! 1. Command line (`--ktrans`, `--gpp`) or environment (`KTRANSW_KTRANS`, `KTRANSW_GPP`)
//! 2. Configuration file (`[tools]` section)
//! 3. Searching PATH for `ktrans` and `gpp`

use std::path::{Path, PathBuf};

use crate::util::config::ToolsConfig;
use crate::util::process::find_executable;

mod gpp;
mod ktrans;

pub use gpp::{gpp_command, GPP_USER_MODE};
pub use ktrans::{ktrans_command, passthrough_command, substitute_source};

/// Default name of the Karel translator.
pub const KTRANS_BIN_NAME: &str = "ktrans";

/// Default name of the generic preprocessor.
pub const GPP_BIN_NAME: &str = "gpp";

/// Locations of the preprocessor and translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Path to ktrans
    pub ktrans: PathBuf,
    /// Path to gpp
    pub gpp: PathBuf,
}

impl Toolchain {
    pub fn new(ktrans: impl Into<PathBuf>, gpp: impl Into<PathBuf>) -> Self {
        Toolchain {
            ktrans: ktrans.into(),
            gpp: gpp.into(),
        }
    }

    /// Work out where the tools live.
    ///
    /// Explicit paths are made absolute. When nothing is configured the
    /// tools are looked up on PATH; if that fails too the bare name is used
    /// and the failure surfaces when the tool is started.
    pub fn detect(
        ktrans: Option<&Path>,
        gpp: Option<&Path>,
        config: &ToolsConfig,
    ) -> anyhow::Result<Self> {
        let ktrans = locate(ktrans.or(config.ktrans.as_deref()), KTRANS_BIN_NAME)?;
        let gpp = locate(gpp.or(config.gpp.as_deref()), GPP_BIN_NAME)?;

        tracing::debug!("setting ktrans path to: {}", ktrans.display());
        tracing::debug!("setting gpp path to: {}", gpp.display());

        Ok(Toolchain { ktrans, gpp })
    }
}

fn locate(explicit: Option<&Path>, name: &str) -> anyhow::Result<PathBuf> {
    match explicit {
        // a bare name is a PATH lookup, anything with a separator is a path
        Some(path) if path.components().count() > 1 => crate::util::fs::absolute(path),
        Some(path) => Ok(find_executable(&path.to_string_lossy())
            .unwrap_or_else(|| path.to_path_buf())),
        None => Ok(find_executable(name).unwrap_or_else(|| PathBuf::from(name))),
    }
}
