mod agents;
mod cli;
mod config;
mod error;
mod github;
mod services;
mod utils;
mod workflow;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use std::error::Error;
use std::io::IsTerminal;
use std::process;
use utils::logging::{VERBOSE_ENV, is_verbose};

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        unsafe {
            std::env::set_var(VERBOSE_ENV, "1");
        }
    }

    let args = workflow::UpdateArgs {
        selector: cli.selector,
        update_local: cli.update_local,
        skip_local: cli.skip_local,
        rebase: cli.rebase,
        repo: cli.repo,
        interactive: std::io::stdin().is_terminal() && std::io::stdout().is_terminal(),
    };

    if let Err(e) = workflow::execute_update(&cli.path, args) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if is_verbose() {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  {} {}", "caused by:".dimmed(), cause);
                source = cause.source();
            }
        }
        process::exit(1);
    }
}
