mod cli;
mod commands;
mod installers;
mod libs;
mod logger;
mod schemas;

use clap::Parser;
use cli::cmd_enums::{Cli, Commands, InstallArgs};
use colored::Colorize;
use commands::{install, version};

fn main() {
    // Argument errors share exit code 1 with the other usage errors; 2 and up
    // belong to the installation stages.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };
    logger::init(cli.debug);

    let code = match cli.command.unwrap_or(Commands::Install(InstallArgs::default())) {
        Commands::Version => {
            version::run();
            0
        }
        Commands::Install(args) => match install::run(args) {
            Ok(code) => code,
            Err(e) => {
                log_error!("{:#}", e);
                1
            }
        },
    };

    std::process::exit(code);
}
