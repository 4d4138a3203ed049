mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    match cli.command {
        Command::Describe { script } => commands::describe(&script),
        Command::List { script } => commands::list(&script),
        Command::Find { script, name } => commands::find(&script, &name),
        Command::Set {
            script,
            name,
            attrs,
        } => commands::set(&script, &name, &attrs),
        Command::Completions { shell } => {
            generate(shell, &mut Cli::command(), "ralsh", &mut io::stdout());
            Ok(())
        }
    }
}
