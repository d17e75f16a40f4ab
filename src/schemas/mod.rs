// Data structures shared across the installer.

// Mode, request, launcher and outcome types of an installation run.
pub mod install;
// The optional `installer.yaml` configuration file.
pub mod installer_config;
