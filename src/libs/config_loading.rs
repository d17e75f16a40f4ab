// Locates and parses the optional `installer.yaml`.
//
// Lookup order:
// 1. the path given with `--config` (or `CRAZEDYN_INSTALLER_CONFIG`),
// 2. `~/.crazedyn/installer.yaml` when it exists,
// 3. built-in defaults.
// An explicitly named file must exist; the home-directory file is optional.

use crate::libs::utilities::path_helpers::expand_tilde;
use crate::schemas::installer_config::InstallerConfig;
use crate::{log_debug, log_info};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the per-user installer config.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".crazedyn").join("installer.yaml"))
}

/// Loads the installer configuration.
///
/// # Arguments
/// * `explicit`: Path passed on the command line, if any.
pub fn load_installer_config(explicit: Option<&str>) -> Result<InstallerConfig> {
    match explicit {
        Some(path) => {
            let path = expand_tilde(path);
            log_info!("Using installer config: {}", path.display().to_string().cyan());
            read_config(&path)
        }
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => {
                log_info!("Using installer config: {}", path.display().to_string().cyan());
                read_config(&path)
            }
            None => {
                log_debug!("No installer config found, using built-in defaults");
                Ok(InstallerConfig::default())
            }
        },
    }
}

fn read_config(path: &Path) -> Result<InstallerConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read installer config {}", path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("Invalid installer config {}. Please check its YAML syntax", path.display()))
}

/// Parses config text. Blank text yields the defaults.
pub fn parse_config(contents: &str) -> Result<InstallerConfig> {
    if contents.trim().is_empty() {
        return Ok(InstallerConfig::default());
    }
    let config: InstallerConfig = serde_yaml::from_str(contents)?;
    log_debug!("Loaded installer config: {:?}", config);
    Ok(config)
}
