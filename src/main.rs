//! # Lectio CLI (`lectio`)
//!
//! ## Usage
//!
//! ```bash
//! lectio --config ./config/lectio.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `lectio search "<query>"` | Route a query and print verses, commentary, or documents |
//! | `lectio context --id <n>` | Full text of a commentary entry |
//! | `lectio context --query <q> --file-path <p>` | Context windows around `q` in a document |
//! | `lectio parse "<query>"` | Show how a query is classified and parsed |
//! | `lectio serve` | Start the HTTP server |
//!
//! Diagnostics are written to stderr through `tracing`; set `RUST_LOG` to
//! change the filter.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lectio::{config, context, search, server};

/// Lectio: scripture reference routing and full-text retrieval.
#[derive(Parser)]
#[command(name = "lectio", version)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/lectio.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query.
    ///
    /// A query containing `:` is read as scripture references
    /// (`John 3:16-18 KJV`); anything else searches the document index.
    Search {
        query: String,

        /// Print the JSON payload instead of a listing.
        #[arg(long)]
        json: bool,
    },

    /// Show context for a commentary entry or a document.
    Context {
        /// Text to locate in the document. Required with `--file-path`.
        #[arg(long)]
        query: Option<String>,

        /// Commentary entry id. Takes precedence over `--file-path`.
        #[arg(long)]
        id: Option<i64>,

        /// Document path relative to `[documents].root`.
        #[arg(long)]
        file_path: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Parse a query without searching.
    Parse { query: String },

    /// Start the HTTP server on `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lectio=info,lectio_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Search { query, json } => {
            search::run_search(&cfg, &query, json).await?;
        }
        Commands::Context {
            query,
            id,
            file_path,
            json,
        } => {
            context::run_context(&cfg, query, id, file_path, json).await?;
        }
        Commands::Parse { query } => {
            search::run_parse(&cfg, &query)?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
