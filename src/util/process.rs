//! Subprocess execution utilities.
//!
//! Every external invocation blocks until the child has exited and its
//! output has been drained. There is no timeout: a hung tool hangs ktransw.

use std::ffi::OsStr;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};

/// Builder for subprocess execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Build the Command.
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Display the command for log messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Exit code and captured text of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub code: i32,
    pub stdout: String,
    /// Empty when the streams were merged into `stdout`.
    pub stderr: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs external tools on behalf of the build orchestrator.
pub trait ProcessRunner {
    /// Run to completion, capturing stdout and stderr separately.
    fn capture(&mut self, cmd: &ProcessBuilder) -> Result<CapturedOutput>;

    /// Run to completion with stderr merged into stdout, preserving the
    /// order in which the tool wrote its messages.
    fn capture_merged(&mut self, cmd: &ProcessBuilder) -> Result<CapturedOutput>;

    /// Run with the parent's stdio and return the exit code.
    fn passthrough(&mut self, cmd: &ProcessBuilder) -> Result<i32>;
}

/// Runs tools as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn capture(&mut self, cmd: &ProcessBuilder) -> Result<CapturedOutput> {
        let output = cmd
            .build_command()
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to execute `{}`", cmd.get_program().display()))?;

        Ok(CapturedOutput {
            code: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn capture_merged(&mut self, cmd: &ProcessBuilder) -> Result<CapturedOutput> {
        // Both streams share one file description, so writes land in the
        // order the tool made them and neither stream can fill up a pipe.
        let mut log = tempfile::tempfile().context("failed to create output capture file")?;
        let stdout = log.try_clone().context("failed to duplicate capture file")?;
        let stderr = log.try_clone().context("failed to duplicate capture file")?;

        let status = cmd
            .build_command()
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .status()
            .with_context(|| format!("failed to execute `{}`", cmd.get_program().display()))?;

        let mut bytes = Vec::new();
        log.seek(SeekFrom::Start(0))
            .and_then(|_| log.read_to_end(&mut bytes))
            .context("failed to read captured output")?;

        Ok(CapturedOutput {
            code: exit_code(status),
            stdout: String::from_utf8_lossy(&bytes).into_owned(),
            stderr: String::new(),
        })
    }

    fn passthrough(&mut self, cmd: &ProcessBuilder) -> Result<i32> {
        let status = cmd
            .build_command()
            .status()
            .with_context(|| format!("failed to execute `{}`", cmd.get_program().display()))?;
        Ok(exit_code(status))
    }
}

/// Exit code of a finished process. A process killed by a signal has no
/// code and is reported as 1.
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
