// Core data model of an installation run: the deployment mode, the request the
// orchestrator receives, the launchers it produces, and the outcome handed back
// to the reporting layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Deployment selection. Decides which packages, launchers and credential
/// steps an installation gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Desktop, // PyQt desktop application only
    Web,     // Web panel only (needs an administrator credential)
    Both,    // Desktop application and web panel
}

impl Mode {
    /// All modes, in the order they are offered by the interactive prompt.
    pub const ALL: [Mode; 3] = [Mode::Desktop, Mode::Web, Mode::Both];

    /// Maps the interactive menu number (1, 2 or 3) to a mode.
    /// Anything else is rejected rather than defaulted.
    pub fn from_selection(selection: u8) -> Option<Mode> {
        match selection {
            1 => Some(Mode::Desktop),
            2 => Some(Mode::Web),
            3 => Some(Mode::Both),
            _ => None,
        }
    }

    /// Whether the desktop GUI is part of this deployment.
    pub fn includes_desktop(self) -> bool {
        matches!(self, Mode::Desktop | Mode::Both)
    }

    /// Whether the web panel is part of this deployment.
    pub fn includes_web(self) -> bool {
        matches!(self, Mode::Web | Mode::Both)
    }

    /// An installation that exposes the web panel must end with an
    /// administrator credential in place.
    pub fn requires_credentials(self) -> bool {
        self.includes_web()
    }

    /// Human readable label used in prompts and the final report.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Desktop => "Desktop GUI",
            Mode::Web => "Web Panel",
            Mode::Both => "Both Desktop & Web",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    /// Accepts the mode names (`desktop`, `web`, `both`) as well as the menu
    /// numbers `1`, `2` and `3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(selection) = trimmed.parse::<u8>() {
            return Mode::from_selection(selection)
                .ok_or_else(|| format!("Invalid mode selection '{trimmed}'. Choose 1, 2 or 3"));
        }
        match trimmed.to_lowercase().as_str() {
            "desktop" => Ok(Mode::Desktop),
            "web" => Ok(Mode::Web),
            "both" => Ok(Mode::Both),
            _ => Err(format!(
                "Invalid mode '{s}'. Must be one of: desktop, web, both"
            )),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::Desktop => write!(f, "desktop"),
            Mode::Web => write!(f, "web"),
            Mode::Both => write!(f, "both"),
        }
    }
}

/// What the user asked for. Built once at the start of a run and never
/// modified; the orchestrator resolves the path itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    /// Raw path as typed or passed on the command line. Empty or whitespace
    /// means "use the default install location".
    pub install_path: String,
    pub mode: Mode,
}

impl InstallRequest {
    pub fn new(install_path: impl Into<String>, mode: Mode) -> Self {
        Self {
            install_path: install_path.into(),
            mode,
        }
    }
}

/// One generated entry-point script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LauncherSpec {
    /// File stem of the script, e.g. `Start_Desktop`.
    pub name: String,
    /// Window title shown by the batch flavour.
    pub title: String,
    /// Directory the script changes into before running `entry_command`.
    pub working_directory: PathBuf,
    /// Command line of the application entry point.
    pub entry_command: String,
    /// Where the script was written.
    pub script_path: PathBuf,
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    DirectoryCreate,
    PayloadCopy,
    DependencyResolve,
    CredentialBootstrap,
    LauncherGenerate,
}

impl Stage {
    /// Stable label printed on failure and used in JSON output.
    pub fn label(self) -> &'static str {
        match self {
            Stage::DirectoryCreate => "directory-create",
            Stage::PayloadCopy => "payload-copy",
            Stage::DependencyResolve => "dependency-resolve",
            Stage::CredentialBootstrap => "credential-bootstrap",
            Stage::LauncherGenerate => "launcher-generate",
        }
    }

    /// Process exit code for a run that failed in this stage.
    pub fn exit_code(self) -> i32 {
        match self {
            Stage::DirectoryCreate => 2,
            Stage::PayloadCopy => 3,
            Stage::DependencyResolve => 4,
            Stage::CredentialBootstrap => 5,
            Stage::LauncherGenerate => 6,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one pipeline run. This is the only value that leaves the
/// orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct InstallationOutcome {
    pub succeeded: bool,
    pub failed_stage: Option<Stage>,
    pub install_path: PathBuf,
    pub mode: Mode,
    pub launchers: Vec<LauncherSpec>,
    pub failure_reason: Option<String>,
}

impl InstallationOutcome {
    pub fn success(install_path: PathBuf, mode: Mode, launchers: Vec<LauncherSpec>) -> Self {
        Self {
            succeeded: true,
            failed_stage: None,
            install_path,
            mode,
            launchers,
            failure_reason: None,
        }
    }

    pub fn failure(install_path: PathBuf, mode: Mode, stage: Stage, reason: String) -> Self {
        Self {
            succeeded: false,
            failed_stage: Some(stage),
            install_path,
            mode,
            launchers: Vec::new(),
            failure_reason: Some(reason),
        }
    }

    /// 0 on success, otherwise the failing stage's code.
    pub fn exit_code(&self) -> i32 {
        self.failed_stage.map(Stage::exit_code).unwrap_or(0)
    }
}
