// Register application subcommands.
// Each module corresponds to a specific `crazedyn-installer` command-line action.

// Runs the installation (interactive or from options).
pub mod install;
// Displays the installer version.
pub mod version;
