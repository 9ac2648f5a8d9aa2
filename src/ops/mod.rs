//! High-level operations.
//!
//! This module contains the implementation of a ktransw invocation.

pub mod ktransw_build;

pub use ktransw_build::{
    remap_workspace_paths, BuildOrchestrator, BuildOutcome, BuildState, FailureReason,
};
