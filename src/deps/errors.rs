//! Dependency resolution error types.

use thiserror::Error;

/// Exit code for a required header that could not be located
/// (`EX_DATAERR` from sysexits.h).
pub const EX_DATAERR: i32 = 65;

/// Error while collecting the dependencies of a source file.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Formatted the way GCC reports a missing include.
    #[error("ktransw: fatal error: {header}: No such file or directory")]
    HeaderNotFound { header: String },
}

impl ResolveError {
    /// The exit code the process should terminate with.
    pub fn exit_code(&self) -> i32 {
        match self {
            ResolveError::HeaderNotFound { .. } => EX_DATAERR,
        }
    }
}
