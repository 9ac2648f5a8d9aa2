//! Build orchestration: dependency output or the gpp → ktrans pipeline.
//!
//! ```text
//! Idle ─┬─> ScanningDependencies ──────────────────────> Done
//!       ├─> NoBuildNeeded ─────────────────────────────> Done
//!       └─> Preprocessing ──> Translating ─────────────> Done
//!                  (any stage) ────────────────────────> Failed(reason)
//! ```
//!
//! Exit codes of the two tools come from unrelated code spaces (gpp's are
//! positive, ktrans' may be negative) and are passed through unmodified.
//! Callers that need to tell them apart must look at the final
//! [`BuildState`], not the code alone.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::{BuildMode, BuildRequest, Verbosity};
use crate::deps::{DependencyRule, IncludeResolver, ResolveError, ResolvePolicy, SystemHeaders};
use crate::toolchain::{gpp_command, ktrans_command, passthrough_command, Toolchain};
use crate::util::process::ProcessRunner;
use crate::util::workspace::{BuildWorkspace, FsRemover};

/// Why a build stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// A header could not be found and missing headers were not tolerated
    MissingHeader(String),
    /// gpp exited non-zero
    Preprocessor(i32),
    /// ktrans exited non-zero
    Translator(i32),
}

/// Where the orchestrator is, or where it stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    ScanningDependencies,
    NoBuildNeeded,
    Preprocessing,
    Translating,
    Done,
    Failed(FailureReason),
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildState::Idle => write!(f, "idle"),
            BuildState::ScanningDependencies => write!(f, "scanning dependencies"),
            BuildState::NoBuildNeeded => write!(f, "no build needed"),
            BuildState::Preprocessing => write!(f, "preprocessing"),
            BuildState::Translating => write!(f, "translating"),
            BuildState::Done => write!(f, "done"),
            BuildState::Failed(reason) => write!(f, "failed ({:?})", reason),
        }
    }
}

/// Final state and exit code of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub state: BuildState,
    pub exit_code: i32,
}

impl BuildOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Drives one build request to completion.
pub struct BuildOrchestrator<'a, R: ProcessRunner> {
    request: &'a BuildRequest,
    toolchain: &'a Toolchain,
    system_headers: &'a SystemHeaders,
    runner: R,
    workspace_root: Option<PathBuf>,
    state: BuildState,
}

impl<'a, R: ProcessRunner> BuildOrchestrator<'a, R> {
    pub fn new(
        request: &'a BuildRequest,
        toolchain: &'a Toolchain,
        system_headers: &'a SystemHeaders,
        runner: R,
    ) -> Self {
        BuildOrchestrator {
            request,
            toolchain,
            system_headers,
            runner,
            workspace_root: None,
            state: BuildState::Idle,
        }
    }

    /// Create build workspaces under `dir` instead of the system temp dir.
    pub fn with_workspace_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(dir.into());
        self
    }

    /// Give back the process runner.
    pub fn into_runner(self) -> R {
        self.runner
    }

    fn transition(&mut self, next: BuildState) {
        tracing::debug!("{} -> {}", self.state, next);
        self.state = next;
    }

    fn finish(&mut self, state: BuildState, exit_code: i32) -> BuildOutcome {
        self.transition(state.clone());
        BuildOutcome { state, exit_code }
    }

    /// Run the build. Tool output goes to `out`, wrapper diagnostics to
    /// `err`.
    ///
    /// Failures of the tools and missing headers are reported through the
    /// returned outcome; an `Err` means ktransw itself could not do its job
    /// (unreadable source, a tool that would not start, ...).
    pub fn run(&mut self, out: &mut dyn Write, err: &mut dyn Write) -> Result<BuildOutcome> {
        let request = self.request;

        let Some(source) = request.source_file.as_deref() else {
            tracing::debug!("doesn't need a build");
            return self.pass_through(out);
        };

        if request.mode == BuildMode::DependencyOnly {
            return self.write_dependencies(source, out, err);
        }

        tracing::debug!("needs a build");
        if request.dry_run {
            tracing::debug!("not calling ktrans or gpp: dry run requested");
            return Ok(self.finish(BuildState::Done, 0));
        }

        match self.workspace_root.clone() {
            Some(root) => {
                let workspace = BuildWorkspace::acquire_in(&root, FsRemover)?;
                self.compile(source, &workspace, out, err)
            }
            None => {
                let workspace = BuildWorkspace::acquire()?;
                self.compile(source, &workspace, out, err)
            }
        }
    }

    fn write_dependencies(
        &mut self,
        source: &Path,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<BuildOutcome> {
        let request = self.request;
        self.transition(BuildState::ScanningDependencies);
        tracing::debug!("dependency output for {}", source.display());

        let references = crate::deps::scan_file(source)?;
        tracing::debug!("found {} includes", references.len());

        let policy = ResolvePolicy {
            ignore_system_headers: request.ignore_system_headers,
            tolerate_missing_headers: request.tolerate_missing_headers,
        };
        let resolver = IncludeResolver::new(&request.include_dirs, self.system_headers);

        let deps = match resolver.collect(references, policy) {
            Ok(deps) => deps,
            Err(e) => {
                writeln!(err, "{}", e)?;
                let code = e.exit_code();
                let ResolveError::HeaderNotFound { header } = e;
                return Ok(self.finish(
                    BuildState::Failed(FailureReason::MissingHeader(header)),
                    code,
                ));
            }
        };

        let target = request.dependency_target().unwrap_or_default();
        let Some(rule) = DependencyRule::from_resolved(target, &deps) else {
            bail!("dependency rule target must not be empty");
        };
        let rule = rule.with_phony_targets(request.emit_phony_targets);

        match request.explicit_dep_file {
            Some(ref path) => rule.write_to_file(path)?,
            None => rule.write_to(out)?,
        }

        Ok(self.finish(BuildState::Done, 0))
    }

    fn pass_through(&mut self, out: &mut dyn Write) -> Result<BuildOutcome> {
        self.transition(BuildState::NoBuildNeeded);

        if self.request.verbosity != Verbosity::Quiet {
            writeln!(out, "KTRANSW V{}", env!("CARGO_PKG_VERSION"))?;
            out.flush()?;
        }

        let cmd = passthrough_command(&self.toolchain.ktrans, &self.request.translator_args);
        tracing::debug!("starting ktrans as: '{}'", cmd.display_command());
        let code = self.runner.passthrough(&cmd)?;
        tracing::debug!("end of ktrans, ret: {}", code);

        let state = if code == 0 {
            BuildState::Done
        } else {
            BuildState::Failed(FailureReason::Translator(code))
        };
        Ok(self.finish(state, code))
    }

    fn compile<O: crate::util::workspace::RemoveOps>(
        &mut self,
        source: &Path,
        workspace: &BuildWorkspace<O>,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<BuildOutcome> {
        let request = self.request;
        let intermediate = workspace.file_path(source);
        tracing::debug!("storing preprocessed source at: {}", intermediate.display());

        self.transition(BuildState::Preprocessing);
        let gpp = gpp_command(
            &self.toolchain.gpp,
            source,
            &intermediate,
            &request.include_dirs,
        );
        tracing::debug!("starting gpp as: '{}'", gpp.display_command());
        let preprocessed = self.runner.capture(&gpp)?;
        tracing::debug!("end of gpp, ret: {}", preprocessed.code);

        if !preprocessed.success() {
            // always relayed, even when quiet
            write!(err, "{}\nTranslation terminated\n", preprocessed.stderr)?;
            err.flush()?;
            return Ok(self.finish(
                BuildState::Failed(FailureReason::Preprocessor(preprocessed.code)),
                preprocessed.code,
            ));
        }

        self.transition(BuildState::Translating);
        let ktrans = ktrans_command(
            &self.toolchain.ktrans,
            &request.translator_args,
            source,
            &intermediate,
        );
        tracing::debug!("starting ktrans as: '{}'", ktrans.display_command());
        let translated = self.runner.capture_merged(&ktrans)?;
        tracing::debug!("end of ktrans, ret: {}", translated.code);

        let source_dir = source.parent().unwrap_or_else(|| Path::new(""));
        let report = remap_workspace_paths(&translated.stdout, workspace.path(), source_dir);

        if !translated.success() || request.verbosity == Verbosity::Verbose {
            out.write_all(report.as_bytes())
                .context("failed to write translator output")?;
            if !report.is_empty() && !report.ends_with('\n') {
                out.write_all(b"\n")?;
            }
            out.flush()?;
        }

        let state = if translated.success() {
            BuildState::Done
        } else {
            BuildState::Failed(FailureReason::Translator(translated.code))
        };
        Ok(self.finish(state, translated.code))
    }
}

/// Point diagnostics that name the workspace at the source's directory
/// instead.
///
/// Only the directory is rewritten: line numbers still refer to the
/// preprocessed file.
pub fn remap_workspace_paths(output: &str, workspace: &Path, source_dir: &Path) -> String {
    let workspace = workspace.to_string_lossy();
    if workspace.is_empty() {
        return output.to_string();
    }
    output.replace(workspace.as_ref(), &source_dir.to_string_lossy())
}
