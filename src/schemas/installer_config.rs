// Schema of the optional `installer.yaml` configuration file.
// Every field has a default, so an empty file (or no file at all) gives the
// stock CrazeDyn Panel installation.

use serde::{Deserialize, Serialize};

/// Which kind of launcher script to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LauncherStyle {
    /// Batch files on Windows, shell scripts everywhere else.
    #[default]
    Auto,
    /// Windows `.bat` files.
    Batch,
    /// POSIX `.sh` files.
    Shell,
}

/// Settings that shape an installation. Loaded once by the command layer and
/// passed by reference into the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Used when the install path prompt is left empty. `~` is expanded.
    pub default_install_path: String,
    /// Directory holding the application payload to copy into `Main/`.
    pub payload_source: String,
    /// Python interpreter used for pip, the admin bootstrap and the launchers.
    pub python: String,
    /// Run `pip install --upgrade pip` before installing the manifest.
    pub upgrade_pip: bool,
    /// Requirements appended to the manifest for every mode.
    pub extra_packages: Vec<String>,
    /// Application entry script inside the payload.
    pub entry_script: String,
    /// Flag that switches the entry script into web panel mode.
    pub web_flag: String,
    /// Interactive administrator setup script inside the payload.
    pub bootstrap_script: String,
    /// File the bootstrap script is expected to leave behind.
    pub credential_store: String,
    /// Address printed after a web installation.
    pub web_url: String,
    pub launcher_style: LauncherStyle,
    /// Name used in launcher titles and the final report.
    pub product_name: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            default_install_path: default_install_location().to_string(),
            payload_source: ".".to_string(),
            python: default_python().to_string(),
            upgrade_pip: true,
            extra_packages: Vec::new(),
            entry_script: "launcher.py".to_string(),
            web_flag: "--web".to_string(),
            bootstrap_script: "setup_admin.py".to_string(),
            credential_store: "admin_config.json".to_string(),
            web_url: "http://localhost:5000".to_string(),
            launcher_style: LauncherStyle::Auto,
            product_name: "CrazeDyn Panel".to_string(),
        }
    }
}

#[cfg(windows)]
fn default_install_location() -> &'static str {
    r"C:\CrazeDynPanel"
}

#[cfg(not(windows))]
fn default_install_location() -> &'static str {
    "~/CrazeDynPanel"
}

#[cfg(windows)]
fn default_python() -> &'static str {
    "python"
}

#[cfg(not(windows))]
fn default_python() -> &'static str {
    "python3"
}
