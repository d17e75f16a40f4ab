// Platform-specific helpers: which launcher flavour fits the host and how to
// mark a generated script as executable.

use crate::log_debug;
use crate::schemas::installer_config::LauncherStyle;
use colored::Colorize;
use std::fs;
use std::io;
use std::path::Path;

/// Concrete script flavour after `LauncherStyle::Auto` has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFlavor {
    Batch,
    Shell,
}

impl ScriptFlavor {
    pub fn from_style(style: LauncherStyle) -> Self {
        match style {
            LauncherStyle::Batch => ScriptFlavor::Batch,
            LauncherStyle::Shell => ScriptFlavor::Shell,
            LauncherStyle::Auto if cfg!(windows) => ScriptFlavor::Batch,
            LauncherStyle::Auto => ScriptFlavor::Shell,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ScriptFlavor::Batch => "bat",
            ScriptFlavor::Shell => "sh",
        }
    }
}

/// Sets 0o755 on a generated shell script.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    log_debug!("[Platform] Making {} executable", path.display().to_string().yellow());
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
}

// Windows decides executability by extension.
#[cfg(not(unix))]
pub fn make_executable(path: &Path) -> io::Result<()> {
    log_debug!(
        "[Platform] {} needs no permission change on this platform",
        path.display().to_string().yellow()
    );
    fs::metadata(path).map(|_| ())
}
