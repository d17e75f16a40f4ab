use crate::cli::type_enums::LaunchTarget;
use crate::schemas::install::Mode;
use clap::{Args, Parser, Subcommand};

/// Defines the command-line interface (CLI) for 'crazedyn-installer'.
/// Without a subcommand the interactive installation starts.
#[derive(Parser)]
#[command(name = "crazedyn-installer")]
#[command(about = "Install the CrazeDyn Panel desktop application and web panel", long_about = None)]
pub struct Cli {
    /// Enables detailed debug output for troubleshooting.
    #[arg(short, long, global = true)]
    pub(crate) debug: bool,

    #[command(subcommand)]
    pub(crate) command: Option<Commands>,
}

/// Supported subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Install CrazeDyn Panel (asks for anything not given as an option).
    Install(InstallArgs),
    /// Show the installer version.
    Version,
}

/// Options of the `install` command. Each one given on the command line
/// replaces the matching interactive prompt.
#[derive(Args, Debug, Default, Clone)]
pub struct InstallArgs {
    /// Installation directory. An empty value selects the default location.
    #[arg(long)]
    pub(crate) path: Option<String>,

    /// Deployment mode: desktop, web or both (1, 2 or 3 are accepted too).
    #[arg(long)]
    pub(crate) mode: Option<Mode>,

    /// Installer configuration file.
    #[arg(long, env = "CRAZEDYN_INSTALLER_CONFIG")]
    pub(crate) config: Option<String>,

    /// Directory containing the application payload (defaults to the config value).
    #[arg(long)]
    pub(crate) payload: Option<String>,

    /// Skip all confirmation prompts.
    #[arg(short, long)]
    pub(crate) yes: bool,

    /// Start the given application after a successful installation.
    #[arg(long)]
    pub(crate) launch: Option<LaunchTarget>,

    /// Print the installation outcome as JSON on stdout.
    #[arg(long)]
    pub(crate) json: bool,
}
