//! Minicommerce CLI - run the mini commerce REST API

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use minicommerce::config::{self, MinicommerceConfig};
use minicommerce::server;
use minicommerce::storage::SqliteStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "minicommerce")]
#[command(version)]
#[command(about = "Mini commerce REST API - users, categories, products, orders and reviews")]
#[command(long_about = r#"
Minicommerce serves a small shop API over HTTP/JSON backed by a SQLite file:
  • Users, categories, products, orders and reviews
  • Stock is reserved when an order is placed and returned when it is cancelled
  • OpenAPI document at /v3/api-docs, browsable docs at /swagger-ui

Example usage:
  minicommerce init --port 8080
  minicommerce serve
  minicommerce serve --database ./shop.db --port 9000
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the config file (defaults to ./minicommerce.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a minicommerce.toml config file
    Init {
        /// Database path to record in the config
        #[arg(short, long)]
        database: Option<String>,

        /// Port to record in the config
        #[arg(short, long)]
        port: Option<u16>,

        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Print the OpenAPI document as JSON
    Openapi,

    /// Show row counts for every table
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Serve { database, host, port, config } => {
            let file_config = config::load_config(config.as_deref())?.unwrap_or_default();
            let settings = file_config.resolve(database, host, port);

            config::ensure_db_dir(&settings.database)?;
            tracing::info!("Opening database {:?}", settings.database);
            let store = SqliteStore::open(&settings.database)?;

            server::start_server(&settings.host, settings.port, store).await?;
        }

        Commands::Init { database, port, force } => {
            let path = config::default_config_path();
            let config = MinicommerceConfig {
                database: Some(database.unwrap_or_else(|| {
                    config::default_database_path().to_string_lossy().to_string()
                })),
                host: Some(config::DEFAULT_HOST.to_string()),
                port: Some(port.unwrap_or(config::DEFAULT_PORT)),
            };
            config::write_config(&path, &config, force)?;
            println!("✅ Wrote {}", path.display());
        }

        Commands::Openapi => {
            println!("{}", serde_json::to_string_pretty(&server::openapi::document())?);
        }

        Commands::Stats { database } => {
            let settings = config::load_config(None)?.unwrap_or_default().resolve(database, None, None);
            config::require_db_file(&settings.database)?;
            let store = SqliteStore::open(&settings.database)?;
            print!("{}", store.stats()?);
        }
    }

    Ok(())
}
