//! Header dependency extraction.
//!
//! Source text is scanned for `%INCLUDE` directives, each header is looked
//! up in the include search path, and the result is written out as a Make
//! rule:
//!
//! ```text
//! source --scan--> references --resolve--> dependencies --emit--> rule
//! ```

pub mod classify;
pub mod emit;
pub mod errors;
pub mod resolve;
pub mod scan;

pub use classify::SystemHeaders;
pub use emit::DependencyRule;
pub use errors::{ResolveError, EX_DATAERR};
pub use resolve::{IncludeResolver, Resolution, ResolvePolicy};
pub use scan::{scan_file, scan_includes, IncludeScanner};
