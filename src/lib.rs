//! ktransw - A preprocessing wrapper around the Karel translator
//!
//! This crate adds C-like macros, multiple include directories and
//! Make-compatible dependency output to ktrans by running every source
//! through gpp first.

pub mod core;
pub mod deps;
pub mod ops;
pub mod toolchain;
pub mod util;

/// Test utilities and mocks for ktransw unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a scripted process runner standing in for
/// gpp and ktrans.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{BuildMode, BuildRequest, SearchPathList, Verbosity};
pub use deps::{DependencyRule, SystemHeaders};
pub use ops::{BuildOrchestrator, BuildOutcome, BuildState};
pub use toolchain::Toolchain;
pub use util::Config;
