// This file contains the logic for the `crazedyn-installer install` command.
// It collects the install path and mode (from options or interactive prompts),
// confirms the choice, hands an `InstallRequest` to the orchestrator, reports the
// outcome and optionally starts the freshly installed application.

use crate::cli::cmd_enums::InstallArgs;
use crate::cli::type_enums::LaunchTarget;
use crate::libs::command_runner::{CommandRunner, SystemRunner};
use crate::libs::config_loading::load_installer_config;
use crate::libs::launcher_generator::launch;
use crate::libs::orchestrator::Orchestrator;
use crate::libs::reporting::{print_json, print_report};
use crate::schemas::install::{InstallRequest, InstallationOutcome, Mode};
use crate::schemas::installer_config::InstallerConfig;
use crate::{log_debug, log_info, log_warn};
use anyhow::{Result, bail};
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Exit code for a run the user cancelled before anything was written.
const EXIT_CANCELLED: i32 = 1;

/// Entry point of the `install` command.
///
/// # Returns
/// The process exit code: 0 on success, the failing stage's code otherwise.
pub fn run(args: InstallArgs) -> Result<i32> {
    log_debug!("Entered install::run() with {:?}", args);

    let mut config = load_installer_config(args.config.as_deref())?;
    if let Some(payload) = &args.payload {
        config.payload_source = payload.clone();
    }

    let interactive = std::io::stdin().is_terminal();
    let confirm = interactive && !args.yes;
    if interactive {
        print_banner(&config);
    }

    let install_path = match &args.path {
        Some(path) => path.clone(),
        None if interactive => prompt_install_path(&config.default_install_path)?,
        None => String::new(),
    };
    let mode = match args.mode {
        Some(mode) => mode,
        None if interactive => prompt_mode()?,
        None => bail!("--mode is required when the installer is not run from a terminal"),
    };
    let request = InstallRequest::new(install_path, mode);

    let runner = SystemRunner;
    let orchestrator = Orchestrator::new(&config, &runner);
    let target = orchestrator.install_path_for(&request);

    if confirm {
        eprintln!("\n{} {}", "Installation path:".bold(), target.display().to_string().cyan());
        eprintln!("{} {}", "Mode:".bold(), mode.label().cyan());
        if !ask("Is this correct?", true)? {
            log_warn!("Installation cancelled.");
            return Ok(EXIT_CANCELLED);
        }
    }
    if target.exists() {
        log_warn!(
            "Directory already exists: {}. Files will be overwritten in place.",
            target.display().to_string().yellow()
        );
        if confirm && !ask("Continue with the existing directory?", false)? {
            log_warn!("Installation cancelled.");
            return Ok(EXIT_CANCELLED);
        }
    }

    let outcome = orchestrator.run(&request);
    if args.json {
        print_json(&outcome)?;
    } else {
        print_report(&outcome, &config);
    }

    if outcome.succeeded {
        let launch_target = match args.launch {
            Some(target) => Some(target),
            None if confirm => prompt_launch(mode)?,
            None => None,
        };
        if let Some(target) = launch_target {
            start_application(&outcome, target, &runner);
        }
        log_info!("Thank you for choosing {}!", config.product_name.bold());
    }

    Ok(outcome.exit_code())
}

fn print_banner(config: &InstallerConfig) {
    let rule = "=".repeat(60);
    eprintln!("{}", rule.bright_yellow());
    eprintln!("{}", format!("  {} - Installer", config.product_name).bright_yellow().bold());
    eprintln!("{}", rule.bright_yellow());
}

fn ask(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Folder name used for the well-known install locations.
const INSTALL_DIR_NAME: &str = "CrazeDynPanel";

/// Locations offered by the path prompt as `(label, path)`, the configured
/// default first. Folders the platform does not know are left out.
pub fn install_location_presets(default: &str) -> Vec<(String, String)> {
    let mut presets = vec![("Default".to_string(), default.to_string())];
    let known = [
        ("Program Files", program_files_dir()),
        ("Documents", dirs::document_dir()),
        ("Desktop", dirs::desktop_dir()),
    ];
    for (label, dir) in known.into_iter().filter_map(|(label, dir)| Some((label, dir?))) {
        let path = dir.join(INSTALL_DIR_NAME).display().to_string();
        if path != default {
            presets.push((label.to_string(), path));
        }
    }
    presets
}

#[cfg(windows)]
fn program_files_dir() -> Option<PathBuf> {
    std::env::var_os("ProgramFiles").map(PathBuf::from)
}

#[cfg(not(windows))]
fn program_files_dir() -> Option<PathBuf> {
    None
}

fn prompt_install_path(default: &str) -> Result<String> {
    let presets = install_location_presets(default);
    let mut items: Vec<String> = presets
        .iter()
        .map(|(label, path)| format!("{label} ({path})"))
        .collect();
    items.push("Custom location".to_string());

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Installation location")
        .items(&items)
        .default(0)
        .interact()?;
    if let Some((_, path)) = presets.get(choice) {
        return Ok(path.clone());
    }

    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Installation path (empty for {default})"))
        .allow_empty(true)
        .interact_text()?;
    Ok(input)
}

/// Maps the typed menu number to a mode; only 1, 2 and 3 are accepted.
pub fn parse_mode_selection(input: &str) -> Result<Mode, String> {
    input
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(Mode::from_selection)
        .ok_or_else(|| "Please enter 1, 2 or 3".to_string())
}

fn prompt_mode() -> Result<Mode> {
    eprintln!("\n{}", "Choose application mode:".bold());
    for (index, mode) in Mode::ALL.iter().enumerate() {
        eprintln!("  {}. {}", index + 1, mode.label());
    }
    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter your choice (1-3)")
        .validate_with(|value: &String| parse_mode_selection(value).map(|_| ()))
        .interact_text()?;
    Ok(parse_mode_selection(&input).map_err(anyhow::Error::msg)?)
}

fn prompt_launch(mode: Mode) -> Result<Option<LaunchTarget>> {
    match mode {
        Mode::Desktop => Ok(ask("Start the desktop application now?", false)?.then_some(LaunchTarget::Desktop)),
        Mode::Web => Ok(ask("Start the web panel now?", false)?.then_some(LaunchTarget::Web)),
        Mode::Both => {
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Start now?")
                .items(&["Desktop GUI", "Web Panel", "Not now"])
                .default(2)
                .interact()?;
            Ok(match choice {
                0 => Some(LaunchTarget::Desktop),
                1 => Some(LaunchTarget::Web),
                _ => None,
            })
        }
    }
}

/// Starts the launcher for `target` if this installation produced one.
/// Failing to start is reported but does not change the outcome.
fn start_application(outcome: &InstallationOutcome, target: LaunchTarget, runner: &dyn CommandRunner) {
    let Some(spec) = outcome
        .launchers
        .iter()
        .find(|spec| spec.name == target.script_name())
    else {
        log_warn!(
            "No {} launcher was installed in {} mode; nothing to start",
            target,
            outcome.mode
        );
        return;
    };
    if let Err(e) = launch(spec, runner) {
        log_warn!("Could not start {}: {}", spec.script_path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::command_runner::testing::RecordingRunner;
    use crate::schemas::install::LauncherSpec;

    #[test]
    fn selection_accepts_only_menu_numbers() {
        assert_eq!(parse_mode_selection(" 1 "), Ok(Mode::Desktop));
        assert_eq!(parse_mode_selection("3"), Ok(Mode::Both));
        assert!(parse_mode_selection("4").is_err());
        assert!(parse_mode_selection("").is_err());
        assert!(parse_mode_selection("web").is_err());
    }

    #[test]
    fn default_location_is_offered_first() {
        let presets = install_location_presets("/opt/panel");
        assert_eq!(presets[0], ("Default".to_string(), "/opt/panel".to_string()));
        assert!(presets[1..].iter().all(|(_, path)| path.ends_with(INSTALL_DIR_NAME)));
    }

    #[test]
    fn presets_do_not_repeat_the_default() {
        if let Some(docs) = dirs::document_dir() {
            let default = docs.join(INSTALL_DIR_NAME).display().to_string();
            let presets = install_location_presets(&default);
            assert_eq!(presets.iter().filter(|(_, path)| *path == default).count(), 1);
        }
    }

    fn web_outcome() -> InstallationOutcome {
        InstallationOutcome::success(
            PathBuf::from("/srv/panel"),
            Mode::Web,
            vec![LauncherSpec {
                name: "Start_Web".to_string(),
                title: "CrazeDyn Panel - Web Panel".to_string(),
                working_directory: PathBuf::from("/srv/panel/Main"),
                entry_command: "python3 launcher.py --web".to_string(),
                script_path: PathBuf::from("/srv/panel/Start_Web.sh"),
            }],
        )
    }

    #[test]
    fn starts_installed_launcher() {
        let runner = RecordingRunner::new();
        start_application(&web_outcome(), LaunchTarget::Web, &runner);
        assert_eq!(runner.count_matching("Start_Web.sh"), 1);
    }

    #[test]
    fn missing_launcher_is_not_started() {
        let runner = RecordingRunner::new();
        start_application(&web_outcome(), LaunchTarget::Desktop, &runner);
        assert!(runner.calls().is_empty());
    }
}
