// Works out which Python packages an installation needs and makes sure they are
// present. The manifest is an ordered set: inserting a package that is already
// listed (under any version specifier) changes nothing, so re-running the
// installer never grows the file.

use crate::installers::pip;
use crate::libs::command_runner::CommandRunner;
use crate::libs::errors::DependencyError;
use crate::libs::utilities::file_operations::{read_lines, write_lines};
use crate::schemas::install::Mode;
use crate::schemas::installer_config::InstallerConfig;
use crate::{log_debug, log_info};
use colored::Colorize;
use std::collections::HashSet;
use std::path::Path;

/// File name of the persisted manifest inside `Main/`.
pub const MANIFEST_FILE: &str = "requirements.txt";

/// Packages every installation needs: process utilities, HTTP client, web
/// framework, web-socket extension, WSGI server and password hashing.
pub const BASE_PACKAGES: [&str; 6] = [
    "psutil",
    "requests",
    "flask",
    "flask-socketio",
    "gunicorn",
    "bcrypt",
];

/// GUI toolkit needed by the desktop application.
pub const GUI_TOOLKIT: &str = "pyqt6";

/// Ordered, de-duplicated list of requirement lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<String>,
    names: HashSet<String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses requirement lines, ignoring blank lines and `#` comments.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut manifest = Self::new();
        for line in lines {
            let line = line.as_ref().trim();
            if !line.is_empty() && !line.starts_with('#') {
                manifest.insert(line);
            }
        }
        manifest
    }

    /// Appends `requirement` unless a requirement for the same package is
    /// already listed.
    ///
    /// # Returns
    /// `true` if the manifest changed.
    pub fn insert(&mut self, requirement: &str) -> bool {
        let requirement = requirement.trim();
        let name = package_name(requirement);
        if name.is_empty() || !self.names.insert(name) {
            return false;
        }
        self.entries.push(requirement.to_string());
        true
    }

    /// Drops the requirement for `package`, whatever its version specifier.
    pub fn remove(&mut self, package: &str) -> bool {
        let name = package_name(package);
        if !self.names.remove(&name) {
            return false;
        }
        self.entries.retain(|entry| package_name(entry) != name);
        true
    }

    pub fn contains(&self, package: &str) -> bool {
        self.names.contains(&package_name(package))
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Normalized package name of a requirement line: everything before a version
/// specifier, extras or environment marker, lower-cased, with `_` and `.`
/// folded to `-`.
pub fn package_name(requirement: &str) -> String {
    let end = requirement
        .find(|c: char| matches!(c, '<' | '>' | '=' | '!' | '~' | '[' | ';' | '@' | ' '))
        .unwrap_or(requirement.len());
    requirement[..end]
        .trim()
        .to_lowercase()
        .replace(['_', '.'], "-")
}

/// Derives the manifest for `mode` on top of whatever `existing` already lists.
///
/// The GUI toolkit is present if and only if the mode includes the desktop
/// application; a leftover entry from a previous desktop install is removed for
/// web-only installs.
pub fn build_manifest(mode: Mode, existing: Manifest, extra_packages: &[String]) -> Manifest {
    let mut manifest = existing;
    for package in BASE_PACKAGES {
        manifest.insert(package);
    }
    if mode.includes_desktop() {
        if !manifest.insert(GUI_TOOLKIT) {
            log_debug!("[Deps] {} already listed, not adding it again", GUI_TOOLKIT);
        }
    } else if manifest.remove(GUI_TOOLKIT) {
        log_debug!("[Deps] Dropped {} for a {} installation", GUI_TOOLKIT, mode);
    }
    for package in extra_packages {
        manifest.insert(package);
    }
    manifest
}

/// Builds and persists the manifest in `main_dir`, then installs it.
///
/// The package installer is always invoked, exactly once, even when every
/// package is already present; pip's own idempotence makes that cheap.
pub fn resolve(
    mode: Mode,
    main_dir: &Path,
    config: &InstallerConfig,
    runner: &dyn CommandRunner,
) -> Result<Manifest, DependencyError> {
    let manifest_path = main_dir.join(MANIFEST_FILE);
    let existing_lines = read_lines(&manifest_path).map_err(|source| DependencyError::ManifestRead {
        path: manifest_path.clone(),
        source,
    })?;
    let manifest = build_manifest(mode, Manifest::from_lines(existing_lines), &config.extra_packages);

    write_lines(&manifest_path, manifest.entries()).map_err(|source| DependencyError::ManifestWrite {
        path: manifest_path.clone(),
        source,
    })?;
    log_info!(
        "[Deps] Manifest for {} mode ({} packages): {}",
        mode.to_string().bold(),
        manifest.len(),
        manifest.entries().join(", ").cyan()
    );

    pip::check_interpreter(runner, &config.python, main_dir)?;
    if config.upgrade_pip {
        pip::upgrade_pip(runner, &config.python, main_dir);
    }
    pip::install_requirements(runner, &config.python, Path::new(MANIFEST_FILE), main_dir)?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::command_runner::testing::RecordingRunner;
    use std::fs;

    fn config() -> InstallerConfig {
        InstallerConfig {
            python: "python3".to_string(),
            ..InstallerConfig::default()
        }
    }

    #[test]
    fn package_name_strips_specifiers() {
        assert_eq!(package_name("PyQt6>=6.9.1"), "pyqt6");
        assert_eq!(package_name("flask_socketio==5.3"), "flask-socketio");
        assert_eq!(package_name("requests[socks]"), "requests");
        assert_eq!(package_name("gevent ; sys_platform != 'win32'"), "gevent");
    }

    #[test]
    fn insert_is_idempotent_across_specifiers() {
        let mut manifest = Manifest::new();
        assert!(manifest.insert("psutil>=5.9.0"));
        assert!(!manifest.insert("psutil"));
        assert!(!manifest.insert("PSUTIL"));
        assert_eq!(manifest.entries(), ["psutil>=5.9.0"]);
    }

    #[test]
    fn every_mode_gets_the_base_set() {
        for mode in Mode::ALL {
            let manifest = build_manifest(mode, Manifest::new(), &[]);
            for package in BASE_PACKAGES {
                assert!(manifest.contains(package), "{package} missing for {mode}");
            }
        }
    }

    #[test]
    fn gui_toolkit_only_with_desktop() {
        assert!(build_manifest(Mode::Desktop, Manifest::new(), &[]).contains(GUI_TOOLKIT));
        assert!(build_manifest(Mode::Both, Manifest::new(), &[]).contains(GUI_TOOLKIT));
        assert!(!build_manifest(Mode::Web, Manifest::new(), &[]).contains(GUI_TOOLKIT));
    }

    #[test]
    fn web_install_drops_leftover_gui_toolkit() {
        let existing = Manifest::from_lines(["PyQt6>=6.9.1", "psutil"]);
        let manifest = build_manifest(Mode::Web, existing, &[]);
        assert!(!manifest.contains(GUI_TOOLKIT));
        assert_eq!(manifest.entries()[0], "psutil");
    }

    #[test]
    fn repeated_resolution_never_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();

        let first = resolve(Mode::Both, dir.path(), &config(), &runner).unwrap();
        let second = resolve(Mode::Both, dir.path(), &config(), &runner).unwrap();
        assert_eq!(first, second);

        let written = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        assert_eq!(written.matches(GUI_TOOLKIT).count(), 1);
        assert_eq!(written.lines().count(), BASE_PACKAGES.len() + 1);
    }

    #[test]
    fn shipped_requirements_are_kept_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            "# shipped with the payload\nminiupnpc>=2.2.2\n\npsutil>=5.9.0\n",
        )
        .unwrap();
        let manifest = resolve(Mode::Web, dir.path(), &config(), &RecordingRunner::new()).unwrap();
        assert_eq!(&manifest.entries()[..2], ["miniupnpc>=2.2.2", "psutil>=5.9.0"]);
        assert_eq!(manifest.len(), BASE_PACKAGES.len() + 1);
    }

    #[test]
    fn installer_runs_once_over_the_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        resolve(Mode::Desktop, dir.path(), &config(), &runner).unwrap();

        assert_eq!(runner.count_matching("pip install -r requirements.txt"), 1);
        assert!(runner.calls().iter().all(|c| c.cwd == dir.path()));
    }

    #[test]
    fn installer_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new().fail_on("install -r", 1);
        let err = resolve(Mode::Desktop, dir.path(), &config(), &runner).unwrap_err();
        assert!(matches!(err, DependencyError::InstallerFailed { .. }));
    }

    #[test]
    fn pip_upgrade_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let runner = RecordingRunner::new();
        let cfg = InstallerConfig {
            upgrade_pip: false,
            ..config()
        };
        resolve(Mode::Web, dir.path(), &cfg, &runner).unwrap();
        assert_eq!(runner.count_matching("--upgrade pip"), 0);
    }

    #[test]
    fn extra_packages_are_appended() {
        let manifest = build_manifest(Mode::Web, Manifest::new(), &["gevent>=23.0.0".to_string()]);
        assert_eq!(manifest.entries().last().map(String::as_str), Some("gevent>=23.0.0"));
    }
}
