use crate::log_debug;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Expands a leading `~` to the user's home directory.
/// Paths without a tilde, or a home directory that cannot be found, are
/// returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Turns the raw install path typed by the user into the directory to install
/// into. Empty or whitespace-only input selects `default_path`.
///
/// # Arguments
/// * `raw`: The path as entered, possibly empty.
/// * `default_path`: The configured default location (may start with `~`).
pub fn resolve_install_path(raw: &str, default_path: &str) -> PathBuf {
    let trimmed = raw.trim();
    let chosen = if trimmed.is_empty() {
        log_debug!(
            "[Paths] No install path given, using default {}",
            default_path.cyan()
        );
        default_path
    } else {
        trimmed
    };
    expand_tilde(chosen)
}

/// Directory inside the install path that receives the payload.
pub fn payload_dir(install_path: &Path) -> PathBuf {
    install_path.join("Main")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_input_use_default() {
        assert_eq!(resolve_install_path("", "/opt/panel"), PathBuf::from("/opt/panel"));
        assert_eq!(resolve_install_path("   \t", "/opt/panel"), PathBuf::from("/opt/panel"));
    }

    #[test]
    fn explicit_path_is_trimmed() {
        assert_eq!(resolve_install_path("  /srv/x  ", "/opt/panel"), PathBuf::from("/srv/x"));
    }

    #[test]
    fn tilde_is_expanded_when_home_is_known() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(resolve_install_path("", "~/CrazeDynPanel"), home.join("CrazeDynPanel"));
        }
    }

    #[test]
    fn payload_goes_into_main() {
        assert_eq!(payload_dir(Path::new("/srv/x")), PathBuf::from("/srv/x/Main"));
    }
}
