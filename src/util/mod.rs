//! Shared utilities

pub mod config;
pub mod fs;
pub mod process;
pub mod workspace;

pub use config::Config;
pub use process::{ProcessBuilder, ProcessRunner, SystemRunner};
pub use workspace::BuildWorkspace;
