//! rawcache - CLI entry point
//!
//! Parses the CLI defined in the library's `cli` module and dispatches to the
//! handlers in `commands/`.

use anyhow::Result;
use clap::Parser;

use rawcache::cli::{Cli, Commands, ConfigCommands};

mod commands;

#[cfg(not(tarpaulin_include))]
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { path, json } => commands::scan::handle(&path, json),
        Commands::Probe { file, full, json } => commands::probe::handle(&file, full, json),
        Commands::Warm {
            path,
            full,
            workers,
            idle_timeout,
            json,
        } => commands::warm::handle(&path, full, workers, idle_timeout, json),
        Commands::Config(command) => match command {
            ConfigCommands::Show => commands::config::handle_show(),
            ConfigCommands::Edit => commands::config::handle_edit(),
        },
        Commands::Completions { shell } => commands::completions::handle(shell),
    }
}
