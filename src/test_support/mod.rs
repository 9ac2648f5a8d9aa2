//! Test utilities and mocks for ktransw unit tests.
//!
//! Provides a scripted [`ProcessRunner`] so the build orchestrator can be
//! exercised without gpp or ktrans installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use ktransw::test_support::{MockExecutor, MockProcessOutput};
//!
//! let mut exec = MockExecutor::new();
//! exec.expect_prefix("gpp", MockProcessOutput::success(""));
//! exec.expect_prefix("ktrans", MockProcessOutput::failure(2, "error"));
//! ```

use anyhow::{bail, Result};

use crate::util::process::{CapturedOutput, ProcessBuilder, ProcessRunner};

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Create an output with both stdout and stderr.
    pub fn with_output(status: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Any => true,
        }
    }
}

type Responder = Box<dyn FnMut(&[String]) -> MockProcessOutput>;

/// Mock process executor for testing command execution.
///
/// Expectations are tried in the order they were added; every executed
/// command is recorded as `program arg1 arg2 ...`.
#[derive(Default)]
pub struct MockExecutor {
    expectations: Vec<(CommandPattern, Responder)>,
    calls: Vec<String>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&mut self, cmd: &str, output: MockProcessOutput) -> &mut Self {
        self.expect_pattern(CommandPattern::Exact(cmd.to_string()), output)
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&mut self, prefix: &str, output: MockProcessOutput) -> &mut Self {
        self.expect_pattern(CommandPattern::StartsWith(prefix.to_string()), output)
    }

    /// Add an expectation returning a fixed output.
    pub fn expect_pattern(&mut self, pattern: CommandPattern, output: MockProcessOutput) -> &mut Self {
        let respond: Responder = Box::new(move |_: &[String]| output.clone());
        self.expectations.push((pattern, respond));
        self
    }

    /// Add an expectation whose output is computed from the arguments the
    /// command was started with.
    pub fn respond_prefix<F>(&mut self, prefix: &str, respond: F) -> &mut Self
    where
        F: FnMut(&[String]) -> MockProcessOutput + 'static,
    {
        self.expectations.push((
            CommandPattern::StartsWith(prefix.to_string()),
            Box::new(respond),
        ));
        self
    }

    /// Get all commands that were called.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    fn run(&mut self, cmd: &ProcessBuilder) -> Result<MockProcessOutput> {
        let full_cmd = cmd.display_command();
        self.calls.push(full_cmd.clone());

        for (pattern, respond) in &mut self.expectations {
            if pattern.matches(&full_cmd) {
                return Ok(respond(cmd.get_args()));
            }
        }

        bail!("unexpected command: {}", full_cmd)
    }
}

impl ProcessRunner for MockExecutor {
    fn capture(&mut self, cmd: &ProcessBuilder) -> Result<CapturedOutput> {
        let output = self.run(cmd)?;
        Ok(CapturedOutput {
            code: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    fn capture_merged(&mut self, cmd: &ProcessBuilder) -> Result<CapturedOutput> {
        let output = self.run(cmd)?;
        Ok(CapturedOutput {
            code: output.status,
            stdout: output.stdout + &output.stderr,
            stderr: String::new(),
        })
    }

    fn passthrough(&mut self, cmd: &ProcessBuilder) -> Result<i32> {
        Ok(self.run(cmd)?.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_expectation_wins() {
        let mut exec = MockExecutor::new();
        exec.expect("gpp -v", MockProcessOutput::success("exact"));
        exec.expect_prefix("gpp", MockProcessOutput::success("prefix"));

        let out = exec.capture(&ProcessBuilder::new("gpp").arg("-v")).unwrap();
        assert_eq!(out.stdout, "exact");
        let out = exec.capture(&ProcessBuilder::new("gpp").arg("-o")).unwrap();
        assert_eq!(out.stdout, "prefix");
        assert_eq!(exec.calls(), ["gpp -v", "gpp -o"]);
    }

    #[test]
    fn test_merged_capture_joins_streams() {
        let mut exec = MockExecutor::new();
        exec.expect_pattern(CommandPattern::Any, MockProcessOutput::with_output(2, "a\n", "b\n"));

        let out = exec.capture_merged(&ProcessBuilder::new("ktrans")).unwrap();
        assert_eq!(out.code, 2);
        assert_eq!(out.stdout, "a\nb\n");
    }

    #[test]
    fn test_unexpected_command_fails() {
        let mut exec = MockExecutor::new();
        assert!(exec.passthrough(&ProcessBuilder::new("ktrans")).is_err());
    }
}
