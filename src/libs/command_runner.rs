// Abstraction over every external process the installer starts: the python
// interpreter check, pip, the interactive admin setup and the final launch.
// Production code goes through `SystemRunner`; tests use `RecordingRunner`,
// which records calls and returns scripted exit codes without spawning anything.

use crate::log_debug;
use colored::Colorize;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Working directory for an external command. Always explicit: the installer
/// never changes its own current directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOptions {
    pub cwd: PathBuf,
}

impl CommandOptions {
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

/// Exit status and captured output of a finished command.
/// Output is empty for interactive runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Short description of the exit status for error messages.
    pub fn describe_status(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {code}"),
            None => "termination by signal".to_string(),
        }
    }
}

/// Synchronous interface to external processes. Every call blocks until the
/// process ends, except `spawn_detached`.
pub trait CommandRunner {
    /// Runs a command with captured stdout and stderr.
    fn run_output(
        &self,
        program: &str,
        args: &[&str],
        options: &CommandOptions,
    ) -> io::Result<CommandOutcome>;

    /// Runs a command attached to the user's terminal (inherited stdio).
    fn run_interactive(
        &self,
        program: &str,
        args: &[&str],
        options: &CommandOptions,
    ) -> io::Result<CommandOutcome>;

    /// Starts a command and returns without waiting for it.
    fn spawn_detached(&self, program: &str, args: &[&str], options: &CommandOptions) -> io::Result<()>;
}

/// Production implementation backed by `std::process::Command`.
pub struct SystemRunner;

impl SystemRunner {
    fn command(program: &str, args: &[&str], cwd: &Path) -> Command {
        log_debug!(
            "[Runner] {} {} (in {})",
            program.cyan(),
            args.join(" ").cyan(),
            cwd.display()
        );
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(cwd);
        cmd
    }
}

impl CommandRunner for SystemRunner {
    fn run_output(
        &self,
        program: &str,
        args: &[&str],
        options: &CommandOptions,
    ) -> io::Result<CommandOutcome> {
        let output = Self::command(program, args, &options.cwd).output()?;
        Ok(CommandOutcome {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn run_interactive(
        &self,
        program: &str,
        args: &[&str],
        options: &CommandOptions,
    ) -> io::Result<CommandOutcome> {
        let status = Self::command(program, args, &options.cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(CommandOutcome {
            code: status.code(),
            ..Default::default()
        })
    }

    fn spawn_detached(&self, program: &str, args: &[&str], options: &CommandOptions) -> io::Result<()> {
        // The child keeps running after the installer exits; the handle is dropped.
        Self::command(program, args, &options.cwd).spawn()?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{CallKind, RecordingRunner};
    use super::*;

    #[test]
    fn outcome_success_requires_zero_code() {
        assert!(CommandOutcome { code: Some(0), ..Default::default() }.success());
        assert!(!CommandOutcome { code: Some(1), ..Default::default() }.success());
        assert!(!CommandOutcome { code: None, ..Default::default() }.success());
    }

    #[test]
    fn recording_runner_scripts_failures() {
        let runner = RecordingRunner::new().fail_on("pip install -r", 2);
        let opts = CommandOptions::in_dir("/tmp");

        let ok = runner.run_output("python3", &["--version"], &opts).unwrap();
        assert!(ok.success());
        let failed = runner
            .run_output("python3", &["-m", "pip", "install", "-r", "requirements.txt"], &opts)
            .unwrap();
        assert_eq!(failed.code, Some(2));

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].kind, CallKind::Output);
        assert_eq!(calls[1].cwd, PathBuf::from("/tmp"));
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_captures_output_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = SystemRunner
            .run_output("pwd", &[], &CommandOptions::in_dir(dir.path()))
            .unwrap();
        assert!(outcome.success());
        assert!(!outcome.stdout.trim().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_reports_nonzero_exit() {
        let outcome = SystemRunner
            .run_output("false", &[], &CommandOptions::in_dir("/"))
            .unwrap();
        assert_eq!(outcome.code, Some(1));
        assert_eq!(outcome.describe_status(), "exit status 1");
    }
}
