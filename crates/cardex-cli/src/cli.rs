//! Command-line interface definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Catalog lookup and search over an HTML documentation corpus.
#[derive(Debug, Parser)]
#[command(name = "cardex", version, about)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the config file (overrides CARDEX_CONFIG).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Content root directory (overrides the configured one).
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Whether the selected command emits machine-readable output.
    pub fn wants_json(&self) -> bool {
        let format = match &self.command {
            Commands::Get { format, .. }
            | Commands::List { format, .. }
            | Commands::Search { format, .. }
            | Commands::Refresh { format, .. }
            | Commands::Warnings { format, .. } => *format,
        };
        format == OutputFormat::Json
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show one content unit by topic and slug.
    Get {
        /// Topic key.
        topic: String,
        /// Article slug within the topic.
        slug: String,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List topics, or the units of one topic.
    List {
        /// Topic key; omit to list all topics.
        topic: Option<String>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Free-text search across the catalog.
    Search {
        /// Query text.
        query: String,
        /// Maximum number of results.
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Rebuild the catalog and report warnings and build duration.
    Refresh {
        /// Bypass the persisted index cache and force a full rebuild.
        #[arg(long)]
        full: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show the data-quality warnings of the active catalog.
    Warnings {
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_search_with_limit() {
        let cli = Cli::try_parse_from(["cardex", "search", "docker", "-n", "5"]).expect("parse");
        match cli.command {
            Commands::Search { query, limit, .. } => {
                assert_eq!(query, "docker");
                assert_eq!(limit, Some(5));
            },
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn wants_json_reflects_format_flag() {
        let cli =
            Cli::try_parse_from(["cardex", "list", "--format", "json"]).expect("parse");
        assert!(cli.wants_json());

        let cli = Cli::try_parse_from(["cardex", "list"]).expect("parse");
        assert!(!cli.wants_json());
    }

    #[test]
    fn verify_cli_contract() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
