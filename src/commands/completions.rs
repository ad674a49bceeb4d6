//! Completions command handler

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell as CompletionShell};
use std::io;

use rawcache::cli::Cli;

/// Generate shell completion scripts on stdout.
#[cfg(not(tarpaulin_include))]
pub fn handle(shell: CompletionShell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
