// Final report of an installation run: where things were installed, which
// launchers exist and how to start them, or which stage failed and why.

use crate::log_error;
use crate::schemas::install::{InstallationOutcome, LauncherSpec};
use crate::schemas::installer_config::InstallerConfig;
use anyhow::Result;
use colored::Colorize;
use prettytable::{Table, format, row};

/// Table of the generated launchers.
pub fn launcher_table(launchers: &[LauncherSpec]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row!["Launcher", "Script", "Runs"]);
    for spec in launchers {
        let script = spec.script_path.display().to_string();
        table.add_row(row![spec.name, script, spec.entry_command]);
    }
    table
}

/// Instructions printed under the launcher table.
pub fn next_steps(outcome: &InstallationOutcome, config: &InstallerConfig) -> Vec<String> {
    let mut steps: Vec<String> = outcome
        .launchers
        .iter()
        .map(|spec| {
            format!(
                "{}: run {} (or `{}` from {})",
                spec.title,
                spec.script_path.display(),
                spec.entry_command,
                spec.working_directory.display()
            )
        })
        .collect();
    if outcome.mode.includes_web() {
        steps.push(format!("Then open {} in your browser", config.web_url));
    }
    steps
}

/// Prints the human readable report.
pub fn print_report(outcome: &InstallationOutcome, config: &InstallerConfig) {
    if outcome.succeeded {
        println!("\n{}", "INSTALLATION COMPLETE".green().bold());
        println!("Location: {}", outcome.install_path.display().to_string().cyan());
        println!("Mode:     {}", outcome.mode.label().cyan());
        launcher_table(&outcome.launchers).printstd();
        println!("\n{}", "How to start:".bold());
        for step in next_steps(outcome, config) {
            println!("  - {step}");
        }
    } else {
        let stage = outcome
            .failed_stage
            .map(|s| s.label())
            .unwrap_or("unknown");
        log_error!("Installation failed at stage '{}'", stage.red().bold());
        if let Some(reason) = &outcome.failure_reason {
            log_error!("Cause: {}", reason);
        }
        log_error!(
            "Fix the cause and run the installer again; completed steps are safely overwritten."
        );
    }
}

/// Prints the outcome as pretty JSON on stdout.
pub fn print_json(outcome: &InstallationOutcome) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(())
}
