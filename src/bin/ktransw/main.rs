//! ktransw CLI - gpp preprocessing and dependency output for ktrans

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ktransw::core::{BuildMode, BuildRequest, SearchPathList, Verbosity};
use ktransw::ops::BuildOrchestrator;
use ktransw::toolchain::Toolchain;
use ktransw::util::config::{global_config_path, load_config, project_config_path, Config};
use ktransw::util::SystemRunner;

mod cli;

use cli::Cli;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    // Parse CLI
    let argv = std::env::args_os().map(|a| a.to_string_lossy().into_owned());
    let cli = Cli::parse_from(cli::normalize_args(argv));

    // Set up logging
    let default_filter = if cli.verbose {
        "ktransw=debug"
    } else if cli.quiet {
        "ktransw=warn"
    } else {
        "ktransw=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();

    tracing::debug!("ktrans wrapper v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("parsed args: {:#?}", cli);

    // Load configuration (global + project, or an explicit file)
    let config = match cli.config {
        Some(ref path) => Config::load(path)?,
        None => {
            let cwd = std::env::current_dir().context("failed to get current directory")?;
            load_config(global_config_path().as_deref(), &project_config_path(&cwd))?
        }
    };

    let toolchain = Toolchain::detect(cli.ktrans.as_deref(), cli.gpp.as_deref(), &config.tools)?;
    let system_headers = config.system_headers();
    tracing::debug!(
        "classifying system headers for release {}",
        system_headers.release()
    );

    let mode = if cli.dep_output || cli.ignore_system_headers {
        BuildMode::DependencyOnly
    } else {
        BuildMode::Compile
    };
    let verbosity = if cli.verbose {
        Verbosity::Verbose
    } else if cli.quiet {
        Verbosity::Quiet
    } else {
        Verbosity::Normal
    };

    let include_dirs = SearchPathList::new(&cli.include_dirs)?;
    let request = BuildRequest::new(cli.ktrans_args, include_dirs)?
        .with_mode(mode)
        .with_verbosity(verbosity)
        .dry_run(cli.dry_run)
        .ignore_system_headers(cli.ignore_system_headers)
        .tolerate_missing_headers(cli.ignore_missing_headers)
        .emit_phony_targets(cli.phony_targets)
        .with_target(cli.dep_target)
        .with_dep_file(cli.dep_file);

    let mut orchestrator = BuildOrchestrator::new(&request, &toolchain, &system_headers, SystemRunner);
    let outcome = orchestrator.run(&mut io::stdout(), &mut io::stderr())?;
    tracing::debug!("finished in state {}, ret: {}", outcome.state, outcome.exit_code);

    Ok(outcome.exit_code)
}
