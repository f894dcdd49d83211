// logscrub/src/main.rs
//! logscrub command-line entry point.

use anyhow::Result;
use clap::Parser;
use log::{debug, LevelFilter};

use logscrub::cli::{Cli, Commands};
use logscrub::commands;
use logscrub::logger;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    let dotenv = dotenvy::dotenv();
    let args = Cli::parse();

    let level = if args.quiet {
        Some(LevelFilter::Off)
    } else if args.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);
    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    match &args.command {
        Commands::Scrub(cmd) => commands::scrub::run(cmd),
        Commands::Search(cmd) => commands::search::run(cmd),
        Commands::Invoke(cmd) => commands::invoke::run(cmd).await,
    }
}
