//! gpp command line.

use std::path::Path;

use crate::core::SearchPathList;
use crate::util::process::ProcessBuilder;

/// gpp mode settings, based on its C++ compatibility mode but with
/// meta-macros introduced by `%` so directives read like Karel's own
/// `%INCLUDE`.
///
/// The escapes (`\n`, `\w`) are interpreted by gpp itself.
pub const GPP_USER_MODE: &[&str] = &[
    // Unix line endings
    "+z",
    // user macros: start, end without arguments, argument start,
    // separator, end, stack, unstack, argument reference, quote
    "-U",
    "",
    "",
    "(",
    ",",
    ")",
    "(",
    ")",
    "#",
    "",
    // meta-macros: start, end without arguments, argument start,
    // separator, end, stack, unstack
    "-M",
    r"\n%\w",
    r"\n",
    " ",
    " ",
    r"\n",
    "",
    "",
];

/// Command that preprocesses `source` into `dest`, searching `include_dirs`
/// for included files.
pub fn gpp_command(
    gpp: &Path,
    source: &Path,
    dest: &Path,
    include_dirs: &SearchPathList,
) -> ProcessBuilder {
    ProcessBuilder::new(gpp)
        .args(GPP_USER_MODE)
        .args(include_dirs.iter().map(|dir| format!("-I{}", dir.display())))
        .arg("-o")
        .arg(dest)
        .arg(source)
}
