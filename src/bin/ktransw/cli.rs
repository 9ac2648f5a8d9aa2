//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

const EPILOG: &str = "\
Example invocation:

  ktransw /IC:\\foo\\bar\\include /IC:\\baz\\include C:\\my_prog.kl /config robot.ini

All arguments using forward-slash notation (except '/I') are passed on
to ktrans.";

/// A wrapper around the Karel command-line translator (ktrans) that adds a
/// C-like preprocessor, support for multiple include directories,
/// conditional compilation, include guards and macros.
#[derive(Parser, Debug)]
#[command(name = "ktransw")]
#[command(version, about, long_about = None, after_help = EPILOG)]
pub struct Cli {
    /// Print (lots of) debug information
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Print nothing, except when ktrans encounters an error
    #[arg(short, long)]
    pub quiet: bool,

    /// Do nothing, except checking parameters
    #[arg(short, long)]
    pub dry_run: bool,

    /// Output GCC compatible dependency file (-M)
    #[arg(long = "M")]
    pub dep_output: bool,

    /// Like -M, but don't include system headers (-MM)
    #[arg(long = "MM")]
    pub ignore_system_headers: bool,

    /// Change the target of the rule emitted by dependency generation
    /// (default: base name of source, with object extension (.pc)) (-MT)
    #[arg(long = "MT", value_name = "target")]
    pub dep_target: Option<String>,

    /// When used with -M or -MM, specifies a file to write the dependencies
    /// to (-MF)
    #[arg(long = "MF", value_name = "file")]
    pub dep_file: Option<PathBuf>,

    /// Assume missing header files are generated files and add them to the
    /// dependency list without raising an error (-MG)
    #[arg(long = "MG")]
    pub ignore_missing_headers: bool,

    /// Add a phony target for each dependency to support renaming
    /// dependencies without having to update the Makefile to match (-MP)
    #[arg(long = "MP")]
    pub phony_targets: bool,

    /// Location of ktrans (by default ktransw searches PATH)
    #[arg(long, env = "KTRANSW_KTRANS", value_name = "PATH")]
    pub ktrans: Option<PathBuf>,

    /// Location of gpp (by default ktransw searches PATH)
    #[arg(long, env = "KTRANSW_GPP", value_name = "PATH")]
    pub gpp: Option<PathBuf>,

    /// Include paths (multiple allowed)
    #[arg(short = 'I', value_name = "PATH", action = ArgAction::Append)]
    pub include_dirs: Vec<PathBuf>,

    /// Read configuration from FILE instead of the default locations
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Arguments to pass on to ktrans. Use normal (forward-slash) notation
    /// here
    #[arg(value_name = "ARG")]
    pub ktrans_args: Vec<String>,
}

/// Rewrite the command line into a form clap understands.
///
/// - `/IPATH` (Windows notation) becomes `-IPATH`
/// - GCC's multi-letter `-M*` options become `--M*` long options
///
/// Nothing after a `--` separator is touched.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Vec::new();
    let mut rest = false;

    for (i, arg) in args.into_iter().enumerate() {
        if i == 0 || rest {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            rest = true;
            out.push(arg);
            continue;
        }

        let normalized = if let Some(dir) = arg.strip_prefix("/I") {
            format!("-I{}", dir)
        } else if matches!(arg.as_str(), "-M" | "-MM" | "-MG" | "-MP" | "-MT" | "-MF") {
            format!("-{}", arg)
        } else if arg.starts_with("-MT") || arg.starts_with("-MF") {
            // attached value, e.g. -MFdeps/main.d
            format!("-{}={}", &arg[..3], &arg[3..])
        } else {
            arg
        };
        out.push(normalized);
    }

    out
}
