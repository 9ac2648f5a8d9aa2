//! ktrans command lines.

use std::path::Path;

use crate::util::process::ProcessBuilder;

/// Replace every argument naming `source` with `replacement`.
pub fn substitute_source(args: &[String], source: &Path, replacement: &Path) -> Vec<String> {
    let source = source.to_string_lossy();
    let replacement = replacement.to_string_lossy();

    args.iter()
        .map(|arg| {
            if *arg == source {
                replacement.clone().into_owned()
            } else {
                arg.clone()
            }
        })
        .collect()
}

/// Command translating the preprocessed file instead of the user's source.
pub fn ktrans_command(
    ktrans: &Path,
    args: &[String],
    source: &Path,
    intermediate: &Path,
) -> ProcessBuilder {
    ProcessBuilder::new(ktrans).args(substitute_source(args, source, intermediate))
}

/// Command handing the arguments to ktrans untouched.
pub fn passthrough_command(ktrans: &Path, args: &[String]) -> ProcessBuilder {
    ProcessBuilder::new(ktrans).args(args)
}
