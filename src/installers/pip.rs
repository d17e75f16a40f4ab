// This module drives `pip` through the configured Python interpreter.
// It is the only place that knows the pip command lines; the dependency
// resolver decides *what* to install and calls in here to do it.

use crate::libs::command_runner::{CommandOptions, CommandRunner};
use crate::libs::errors::DependencyError;
use crate::{log_debug, log_error, log_info, log_warn};
use colored::Colorize;
use std::path::Path;

/// Lines of pip's stderr kept in a failure message.
const STDERR_TAIL_LINES: usize = 20;

/// Confirms the interpreter can be started and reports its version.
///
/// # Returns
/// The version line printed by `<python> --version`.
pub fn check_interpreter(
    runner: &dyn CommandRunner,
    python: &str,
    working_dir: &Path,
) -> Result<String, DependencyError> {
    log_info!("[Pip] Checking Python installation ({})", python.cyan());
    let outcome = runner
        .run_output(python, &["--version"], &CommandOptions::in_dir(working_dir))
        .map_err(|e| DependencyError::InterpreterUnavailable {
            python: python.to_string(),
            reason: e.to_string(),
        })?;

    if !outcome.success() {
        return Err(DependencyError::InterpreterUnavailable {
            python: python.to_string(),
            reason: format!("`{python} --version` ended with {}", outcome.describe_status()),
        });
    }

    // Older interpreters print their version on stderr.
    let version = [outcome.stdout.trim(), outcome.stderr.trim()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("unknown version")
        .to_string();
    log_info!("[Pip] Python found: {}", version.green());
    Ok(version)
}

/// Upgrades pip itself. Best effort: a failure is logged and ignored.
pub fn upgrade_pip(runner: &dyn CommandRunner, python: &str, working_dir: &Path) {
    log_info!("[Pip] Upgrading pip...");
    let args = ["-m", "pip", "install", "--upgrade", "pip"];
    match runner.run_output(python, &args, &CommandOptions::in_dir(working_dir)) {
        Ok(outcome) if outcome.success() => log_debug!("[Pip] pip is up to date"),
        Ok(outcome) => log_warn!(
            "[Pip] pip self-upgrade ended with {}, continuing with the installed pip",
            outcome.describe_status()
        ),
        Err(e) => log_warn!("[Pip] pip self-upgrade could not start: {}, continuing", e),
    }
}

/// Installs every requirement listed in `manifest_file` with one
/// `pip install -r` call, run from `working_dir`.
pub fn install_requirements(
    runner: &dyn CommandRunner,
    python: &str,
    manifest_file: &Path,
    working_dir: &Path,
) -> Result<(), DependencyError> {
    let manifest_arg = manifest_file.to_string_lossy();
    let args = ["-m", "pip", "install", "-r", &*manifest_arg];
    log_info!(
        "[Pip] Executing: {} {}",
        python.cyan().bold(),
        args.join(" ").cyan()
    );
    log_info!("[Pip] This may take a few minutes...");

    let outcome = runner
        .run_output(python, &args, &CommandOptions::in_dir(working_dir))
        .map_err(DependencyError::InstallerSpawn)?;

    if !outcome.stdout.is_empty() {
        log_debug!("[Pip] Stdout: {}", outcome.stdout);
    }

    if outcome.success() {
        if !outcome.stderr.trim().is_empty() {
            log_warn!("[Pip] Stderr (might contain warnings): {}", outcome.stderr.trim());
        }
        log_info!("[Pip] Requirements installed {}", "successfully".green());
        Ok(())
    } else {
        let stderr = tail(&outcome.stderr, STDERR_TAIL_LINES);
        log_error!(
            "[Pip] Installation failed with {}: {}",
            outcome.describe_status().red(),
            stderr.red()
        );
        Err(DependencyError::InstallerFailed {
            status: outcome.describe_status(),
            stderr,
        })
    }
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.trim().lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}
