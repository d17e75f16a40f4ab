// Decides whether an installation needs an administrator credential and, if so,
// runs the payload's interactive admin setup exactly once. A web panel without
// an administrator is not a valid end state, so a failed setup stops the run.

use crate::libs::command_runner::{CommandOptions, CommandRunner};
use crate::libs::errors::CredentialError;
use crate::schemas::install::Mode;
use crate::schemas::installer_config::InstallerConfig;
use crate::{log_debug, log_error, log_info, log_warn};
use colored::Colorize;
use std::path::Path;

/// What the gate did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapDecision {
    /// Desktop-only installation; nothing was run and no credential store exists.
    Skipped,
    /// The admin setup ran and exited successfully.
    Completed,
}

/// Runs the admin setup for web-capable modes, does nothing for Desktop.
///
/// The setup script is attached to the user's terminal because it prompts for
/// the e-mail and password. It is never retried.
pub fn maybe_bootstrap(
    mode: Mode,
    main_dir: &Path,
    config: &InstallerConfig,
    runner: &dyn CommandRunner,
) -> Result<BootstrapDecision, CredentialError> {
    if !mode.requires_credentials() {
        log_debug!("[Admin] {} mode has no web panel, skipping admin setup", mode);
        return Ok(BootstrapDecision::Skipped);
    }

    let script = main_dir.join(&config.bootstrap_script);
    if !script.is_file() {
        log_error!(
            "[Admin] Admin setup script not found at {}",
            script.display().to_string().red()
        );
        return Err(CredentialError::ScriptMissing(script));
    }

    log_info!("[Admin] Create the administrator account for the web panel");
    let outcome = runner
        .run_interactive(
            &config.python,
            &[config.bootstrap_script.as_str()],
            &CommandOptions::in_dir(main_dir),
        )
        .map_err(CredentialError::Spawn)?;

    if !outcome.success() {
        log_error!("[Admin] Admin setup ended with {}", outcome.describe_status().red());
        return Err(CredentialError::Failed(outcome.describe_status()));
    }

    let store = main_dir.join(&config.credential_store);
    if store.is_file() {
        log_info!(
            "[Admin] Administrator credentials stored in {}",
            store.display().to_string().green()
        );
    } else {
        log_warn!(
            "[Admin] Admin setup succeeded but {} was not found; check the web panel login",
            store.display().to_string().yellow()
        );
    }
    Ok(BootstrapDecision::Completed)
}
