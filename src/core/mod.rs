//! Core data structures for ktransw.
//!
//! This module contains the types shared by the dependency engine and the
//! build orchestrator:
//! - Header references and their resolutions
//! - The per-invocation build request

pub mod header;
pub mod request;

pub use header::{HeaderReference, ResolvedDependency};
pub use request::{BuildMode, BuildRequest, SearchPathList, Verbosity};
