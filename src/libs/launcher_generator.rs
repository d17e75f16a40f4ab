// Generates one start script per installed application. A script changes into
// `Main/`, runs the entry point and, when the application exits with an error,
// waits for a key press so the message stays readable.
//
// Rendering is a pure function of its inputs; writing the same launchers twice
// produces byte-identical files.

use crate::libs::command_runner::{CommandOptions, CommandRunner};
use crate::libs::errors::LauncherError;
use crate::libs::utilities::path_helpers::payload_dir;
use crate::libs::utilities::platform::{ScriptFlavor, make_executable};
use crate::schemas::install::{LauncherSpec, Mode};
use crate::schemas::installer_config::InstallerConfig;
use crate::{log_debug, log_info};
use colored::Colorize;
use std::fs;
use std::io;
use std::path::Path;

/// The applications a launcher can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherKind {
    Desktop,
    Web,
}

impl LauncherKind {
    /// Launchers selected by a mode, desktop first.
    pub fn for_mode(mode: Mode) -> Vec<LauncherKind> {
        let mut kinds = Vec::with_capacity(2);
        if mode.includes_desktop() {
            kinds.push(LauncherKind::Desktop);
        }
        if mode.includes_web() {
            kinds.push(LauncherKind::Web);
        }
        kinds
    }

    /// Script file stem.
    pub fn script_name(self) -> &'static str {
        match self {
            LauncherKind::Desktop => "Start_Desktop",
            LauncherKind::Web => "Start_Web",
        }
    }

    fn title_suffix(self) -> &'static str {
        match self {
            LauncherKind::Desktop => "Desktop Mode",
            LauncherKind::Web => "Web Panel",
        }
    }
}

/// Builds the launcher descriptions for `kinds` without touching the disk.
pub fn plan_launchers(
    kinds: &[LauncherKind],
    install_path: &Path,
    config: &InstallerConfig,
    flavor: ScriptFlavor,
) -> Vec<LauncherSpec> {
    let working_directory = payload_dir(install_path);
    kinds
        .iter()
        .map(|kind| {
            let entry_command = match kind {
                LauncherKind::Desktop => format!("{} {}", config.python, config.entry_script),
                LauncherKind::Web => format!(
                    "{} {} {}",
                    config.python, config.entry_script, config.web_flag
                ),
            };
            LauncherSpec {
                name: kind.script_name().to_string(),
                title: format!("{} - {}", config.product_name, kind.title_suffix()),
                working_directory: working_directory.clone(),
                entry_command,
                script_path: install_path
                    .join(format!("{}.{}", kind.script_name(), flavor.extension())),
            }
        })
        .collect()
}

/// Script text for `spec` in the given flavour.
pub fn render_script(spec: &LauncherSpec, flavor: ScriptFlavor) -> String {
    let working_dir = spec.working_directory.display().to_string();
    match flavor {
        ScriptFlavor::Batch => [
            "@echo off".to_string(),
            format!("title {}", escape_batch_percent(&spec.title)),
            format!("cd /d \"{}\"", escape_batch_percent(&working_dir)),
            spec.entry_command.clone(),
            "if errorlevel 1 pause".to_string(),
            String::new(),
        ]
        .join("\r\n"),
        ScriptFlavor::Shell => [
            "#!/bin/sh".to_string(),
            format!("# {}", spec.title),
            format!("cd \"{}\" || exit 1", escape_double_quoted(&working_dir)),
            spec.entry_command.clone(),
            "status=$?".to_string(),
            "if [ \"$status\" -ne 0 ]; then".to_string(),
            "    printf 'Exited with status %s. Press Enter to close...' \"$status\"".to_string(),
            "    read -r _".to_string(),
            "fi".to_string(),
            "exit \"$status\"".to_string(),
            String::new(),
        ]
        .join("\n"),
    }
}

// Characters that stay special inside a double-quoted sh string.
fn escape_double_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// `%` starts a variable expansion in batch files, even inside quotes.
fn escape_batch_percent(value: &str) -> String {
    value.replace('%', "%%")
}

/// Writes one launcher per mode bit into `install_path`, overwriting older
/// copies.
pub fn generate(
    mode: Mode,
    install_path: &Path,
    config: &InstallerConfig,
) -> Result<Vec<LauncherSpec>, LauncherError> {
    let flavor = ScriptFlavor::from_style(config.launcher_style);
    let launchers = plan_launchers(&LauncherKind::for_mode(mode), install_path, config, flavor);

    for spec in &launchers {
        write_launcher(spec, flavor)?;
        log_info!(
            "[Launchers] Created {}",
            spec.script_path.display().to_string().green()
        );
    }
    Ok(launchers)
}

fn write_launcher(spec: &LauncherSpec, flavor: ScriptFlavor) -> Result<(), LauncherError> {
    log_debug!("[Launchers] Writing {} ({:?})", spec.name, flavor);
    fs::write(&spec.script_path, render_script(spec, flavor)).map_err(|source| LauncherError::Write {
        path: spec.script_path.clone(),
        source,
    })?;
    if flavor == ScriptFlavor::Shell {
        make_executable(&spec.script_path).map_err(|source| LauncherError::Permissions {
            path: spec.script_path.clone(),
            source,
        })?;
    }
    Ok(())
}

/// Starts a generated launcher without waiting for it.
///
/// Batch files go through `cmd /C start` so they get their own console window;
/// shell scripts are executed directly.
pub fn launch(spec: &LauncherSpec, runner: &dyn CommandRunner) -> io::Result<()> {
    let script = spec.script_path.to_string_lossy();
    let cwd = spec
        .script_path
        .parent()
        .unwrap_or(spec.working_directory.as_path())
        .to_path_buf();
    log_info!("[Launchers] Starting {}", spec.title.bold());

    let is_batch = spec
        .script_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bat"));
    if is_batch {
        runner.spawn_detached("cmd", &["/C", "start", "", &*script], &CommandOptions::in_dir(cwd))
    } else {
        runner.spawn_detached(&script, &[], &CommandOptions::in_dir(cwd))
    }
}
