// The installation state machine. Runs the stages strictly in order:
//
//   directories -> payload -> dependencies -> admin credentials -> launchers
//
// Every stage is a hard gate: the first failure ends the run and is reported
// with its stage. Finished stages are left in place; running the installer
// again converges because every stage overwrites what it produced before.

use crate::libs::command_runner::CommandRunner;
use crate::libs::credential_gate::maybe_bootstrap;
use crate::libs::dependency_resolver;
use crate::libs::errors::InstallError;
use crate::libs::launcher_generator;
use crate::libs::payload::{copy_payload, prepare_directories};
use crate::libs::utilities::path_helpers::{expand_tilde, resolve_install_path};
use crate::schemas::install::{InstallRequest, InstallationOutcome, LauncherSpec, Mode};
use crate::schemas::installer_config::InstallerConfig;
use crate::{log_debug, log_error, log_info, log_stage};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Runs installations with one configuration and one command runner.
pub struct Orchestrator<'a> {
    config: &'a InstallerConfig,
    runner: &'a dyn CommandRunner,
    payload_source: PathBuf,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a InstallerConfig, runner: &'a dyn CommandRunner) -> Self {
        Self {
            config,
            runner,
            payload_source: expand_tilde(&config.payload_source),
        }
    }

    /// Install path a request resolves to (default substituted for empty input).
    pub fn install_path_for(&self, request: &InstallRequest) -> PathBuf {
        resolve_install_path(&request.install_path, &self.config.default_install_path)
    }

    /// Runs the whole pipeline for `request`.
    pub fn run(&self, request: &InstallRequest) -> InstallationOutcome {
        let install_path = self.install_path_for(request);
        log_info!(
            "Installing {} ({}) into {}",
            self.config.product_name.bold(),
            request.mode.label().cyan(),
            install_path.display().to_string().cyan()
        );

        match self.execute(&install_path, request.mode) {
            Ok(launchers) => {
                log_debug!("Pipeline finished with {} launcher(s)", launchers.len());
                InstallationOutcome::success(install_path, request.mode, launchers)
            }
            Err(err) => {
                let stage = err.stage();
                log_error!("Stage '{}' failed: {}", stage.label().red().bold(), err);
                InstallationOutcome::failure(install_path, request.mode, stage, err.to_string())
            }
        }
    }

    fn execute(&self, install_path: &Path, mode: Mode) -> Result<Vec<LauncherSpec>, InstallError> {
        log_stage!("Creating install directory");
        let main_dir = prepare_directories(install_path)?;

        log_stage!("Copying application files");
        copy_payload(
            &self.payload_source,
            install_path,
            &main_dir,
            &self.config.entry_script,
        )?;

        log_stage!("Installing dependencies");
        dependency_resolver::resolve(mode, &main_dir, self.config, self.runner)?;

        log_stage!("Administrator credentials");
        maybe_bootstrap(mode, &main_dir, self.config, self.runner)?;

        log_stage!("Creating launchers");
        Ok(launcher_generator::generate(mode, install_path, self.config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::command_runner::testing::RecordingRunner;
    use crate::libs::dependency_resolver::{GUI_TOOLKIT, MANIFEST_FILE};
    use crate::schemas::install::Stage;
    use crate::schemas::installer_config::LauncherStyle;
    use std::fs;

    struct Fixture {
        _payload: tempfile::TempDir,
        target: tempfile::TempDir,
        config: InstallerConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let payload = tempfile::tempdir().unwrap();
            fs::write(payload.path().join("launcher.py"), "# entry\n").unwrap();
            fs::write(payload.path().join("setup_admin.py"), "# admin\n").unwrap();
            fs::create_dir_all(payload.path().join("web_panel")).unwrap();
            fs::write(payload.path().join("web_panel/app.py"), "# flask\n").unwrap();

            let target = tempfile::tempdir().unwrap();
            let config = InstallerConfig {
                default_install_path: target.path().join("DefaultPanel").display().to_string(),
                payload_source: payload.path().display().to_string(),
                python: "python3".to_string(),
                launcher_style: LauncherStyle::Shell,
                ..InstallerConfig::default()
            };
            Self {
                _payload: payload,
                target,
                config,
            }
        }

        fn manifest(&self, install: &Path) -> String {
            fs::read_to_string(install.join("Main").join(MANIFEST_FILE)).unwrap()
        }
    }

    #[test]
    fn desktop_install_into_default_path() {
        let fx = Fixture::new();
        let runner = RecordingRunner::new();
        let outcome = Orchestrator::new(&fx.config, &runner).run(&InstallRequest::new("", Mode::Desktop));

        let install = fx.target.path().join("DefaultPanel");
        assert!(outcome.succeeded);
        assert_eq!(outcome.failed_stage, None);
        assert_eq!(outcome.install_path, install);
        assert!(install.join("Main/launcher.py").is_file());
        assert!(install.join("Main/web_panel/app.py").is_file());
        assert!(fx.manifest(&install).contains(GUI_TOOLKIT));
        assert_eq!(runner.count_matching("setup_admin.py"), 0);
        assert!(install.join("Start_Desktop.sh").is_file());
        assert!(!install.join("Start_Web.sh").exists());
        assert_eq!(outcome.launchers.len(), 1);
    }

    #[test]
    fn web_install_into_explicit_path() {
        let fx = Fixture::new();
        let runner = RecordingRunner::new();
        let install = fx.target.path().join("X");
        let request = InstallRequest::new(install.display().to_string(), Mode::Web);
        let outcome = Orchestrator::new(&fx.config, &runner).run(&request);

        assert!(outcome.succeeded);
        assert!(install.join("Main/launcher.py").is_file());
        assert!(!fx.manifest(&install).contains(GUI_TOOLKIT));
        assert_eq!(runner.count_matching("setup_admin.py"), 1);
        assert!(install.join("Start_Web.sh").is_file());
        assert!(!install.join("Start_Desktop.sh").exists());
    }

    #[test]
    fn directory_failure_stops_before_payload_copy() {
        let fx = Fixture::new();
        let blocker = fx.target.path().join("file");
        fs::write(&blocker, "occupied").unwrap();
        let runner = RecordingRunner::new();
        let request = InstallRequest::new(blocker.join("install").display().to_string(), Mode::Both);
        let outcome = Orchestrator::new(&fx.config, &runner).run(&request);

        assert!(!outcome.succeeded);
        assert_eq!(outcome.failed_stage, Some(Stage::DirectoryCreate));
        assert!(runner.calls().is_empty());
        assert!(outcome.launchers.is_empty());
    }

    #[test]
    fn dependency_failure_skips_credentials_and_launchers() {
        let fx = Fixture::new();
        let runner = RecordingRunner::new().fail_on("pip install -r", 1);
        let install = fx.target.path().join("Both");
        let request = InstallRequest::new(install.display().to_string(), Mode::Both);
        let outcome = Orchestrator::new(&fx.config, &runner).run(&request);

        assert!(!outcome.succeeded);
        assert_eq!(outcome.failed_stage, Some(Stage::DependencyResolve));
        assert_eq!(runner.count_matching("setup_admin.py"), 0);
        assert!(!install.join("Start_Desktop.sh").exists());
        assert!(!install.join("Start_Web.sh").exists());
        // Earlier stages are not rolled back.
        assert!(install.join("Main/launcher.py").is_file());
    }

    #[test]
    fn missing_payload_fails_in_copy_stage() {
        let mut fx = Fixture::new();
        fx.config.payload_source = fx.target.path().join("no-payload").display().to_string();
        let runner = RecordingRunner::new();
        let request = InstallRequest::new(fx.target.path().join("P").display().to_string(), Mode::Web);
        let outcome = Orchestrator::new(&fx.config, &runner).run(&request);

        assert_eq!(outcome.failed_stage, Some(Stage::PayloadCopy));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn credential_failure_skips_launchers() {
        let fx = Fixture::new();
        let runner = RecordingRunner::new().fail_on("setup_admin.py", 1);
        let install = fx.target.path().join("W");
        let request = InstallRequest::new(install.display().to_string(), Mode::Web);
        let outcome = Orchestrator::new(&fx.config, &runner).run(&request);

        assert_eq!(outcome.failed_stage, Some(Stage::CredentialBootstrap));
        assert_eq!(outcome.exit_code(), 5);
        assert!(!install.join("Start_Web.sh").exists());
    }

    #[test]
    fn rerun_converges_to_the_same_tree() {
        let fx = Fixture::new();
        let runner = RecordingRunner::new();
        let install = fx.target.path().join("Again");
        let request = InstallRequest::new(install.display().to_string(), Mode::Both);
        let orchestrator = Orchestrator::new(&fx.config, &runner);

        assert!(orchestrator.run(&request).succeeded);
        let manifest = fx.manifest(&install);
        let launcher = fs::read(install.join("Start_Web.sh")).unwrap();

        assert!(orchestrator.run(&request).succeeded);
        assert_eq!(fx.manifest(&install), manifest);
        assert_eq!(fs::read(install.join("Start_Web.sh")).unwrap(), launcher);
        assert_eq!(runner.count_matching("setup_admin.py"), 2);
    }
}
