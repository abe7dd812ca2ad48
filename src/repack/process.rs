//! External tool invocation.
//!
//! The pipeline drives pip and the dify-plugin packager as subprocesses.
//! Output streams straight to the terminal; callers get the exit status
//! back as a structured result and decide what a non-zero exit means.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use super::error::RepackResult;

/// Result of running an external tool.
#[derive(Debug)]
pub struct ExecutionResult {
    /// Exit status of the tool
    pub status: ExitStatus,

    /// Time taken to run
    pub duration: Duration,
}

impl ExecutionResult {
    /// Check if the tool succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Get the exit code.
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }
}

/// Runs external tools with stdio passed through to the terminal.
#[derive(Debug, Default)]
pub struct ToolRunner {
    /// Working directory for the tool (inherited if unset)
    pub working_dir: Option<PathBuf>,
}

impl ToolRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the working directory the tool runs in.
    #[must_use]
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    /// Run a tool to completion.
    ///
    /// stdin/stdout/stderr are inherited so interactive progress from pip
    /// and the packager reaches the user. Spawn failures surface as IO
    /// errors; a non-zero exit is reported in the result, not as an error.
    pub fn run<S: AsRef<OsStr>>(
        &self,
        program: impl AsRef<OsStr>,
        args: &[S],
    ) -> RepackResult<ExecutionResult> {
        let start = Instant::now();

        let mut cmd = Command::new(program);
        cmd.args(args);

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        let status = cmd.status()?;

        Ok(ExecutionResult { status, duration: start.elapsed() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_creation() {
        let runner = ToolRunner::new();
        assert!(runner.working_dir.is_none());
    }

    #[test]
    fn test_runner_in_dir() {
        let runner = ToolRunner::new().in_dir(Path::new("/tmp"));
        assert_eq!(runner.working_dir.as_deref(), Some(Path::new("/tmp")));
    }

    #[test]
    #[cfg(unix)]
    fn test_run_success_and_failure() {
        let runner = ToolRunner::new();

        let result = runner.run("true", &[] as &[&str]).unwrap();
        assert!(result.success());
        assert_eq!(result.code(), Some(0));

        let result = runner.run("false", &[] as &[&str]).unwrap();
        assert!(!result.success());
        assert_eq!(result.code(), Some(1));
    }

    #[test]
    #[cfg(unix)]
    fn test_run_in_working_dir() {
        let temp = tempfile::tempdir().unwrap();
        let runner = ToolRunner::new().in_dir(temp.path());

        let result = runner.run("ls", &[] as &[&str]).unwrap();
        assert!(result.success());
    }

    #[test]
    fn test_run_missing_program_is_io_error() {
        let runner = ToolRunner::new();
        let result = runner.run("definitely-not-a-real-binary", &[] as &[&str]);
        assert!(result.is_err());
    }
}
