// Prints the installer version baked in at build time.

use crate::log_info;
use colored::Colorize;

/// Version string from `Cargo.toml`.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Entry point of the `version` command.
pub fn run() {
    log_info!("{} {}", env!("CARGO_PKG_NAME").bold(), version().green());
    println!("{}", version());
}
