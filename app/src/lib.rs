//! nobg: remove image backgrounds through a remote removal service.
//!
//! The selection/processing state machine lives in `nobg-session`; this crate
//! is the shell around it: the HTTP client, the timeout race, persistence of
//! the API key and preferences, and the command-line front end.

pub mod cli;
pub mod clients;
mod commands;
pub mod config;
pub mod error;
pub mod keychain;
pub mod log;
pub mod processing;

use clap::Parser;

use crate::cli::{Cli, Command};

/// Parse the command line, run it and return the process exit code.
pub fn run() -> i32 {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Some(::log::LevelFilter::Error)
    } else if cli.verbose {
        Some(::log::LevelFilter::Debug)
    } else {
        None
    };
    log::init(level);

    ::log::debug!("nobg v{}", env!("CARGO_PKG_VERSION"));

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Fatal: Failed to start runtime: {e}");
            return 1;
        }
    };

    let result = match cli.command {
        Command::Remove(args) => runtime.block_on(commands::remove::run(args, cli.quiet)),
        Command::Key { action } => commands::key::run(action),
        Command::Config { action } => commands::preferences::run(action),
    };

    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}
