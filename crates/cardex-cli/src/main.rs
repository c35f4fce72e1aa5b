//! cardex CLI - catalog lookup and search over an HTML documentation corpus.
//!
//! This is the main entry point for the cardex command-line interface.
//! Command implementations live in separate modules under `commands`.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    execute_command(cli).await
}

fn initialize_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet || cli.wants_json() {
        // Keep stdout clean for machine-readable output.
        Level::ERROR
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn execute_command(cli: Cli) -> Result<()> {
    let catalog = commands::open_catalog(&cli).await?;

    match &cli.command {
        Commands::Get {
            topic,
            slug,
            format,
        } => {
            let query = catalog.load().await?;
            commands::get::execute(&query, topic, slug, *format)
        },
        Commands::List { topic, format } => {
            let query = catalog.load().await?;
            commands::list::execute(&query, topic.as_deref(), *format)
        },
        Commands::Search {
            query: text,
            limit,
            format,
        } => {
            let query = catalog.load().await?;
            let limit = limit.unwrap_or(catalog.search_limit);
            commands::search::execute(&query, text, limit, *format)
        },
        Commands::Refresh { format, .. } => commands::refresh::execute(&catalog, *format).await,
        Commands::Warnings { format } => {
            catalog.load().await?;
            commands::warnings::execute(&catalog.builder, *format)
        },
    }
}
