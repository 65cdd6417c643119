/// Main entry point for the habit ledger server
///
/// Sets up logging, reads configuration, opens the configured document store
/// and serves JSON-RPC tool calls over stdin/stdout.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use habit_ledger::config::CONFIG_FILE_NAME;
use habit_ledger::mcp::McpServer;
use habit_ledger::{Backend, HabitLedger, JsonFileStore, LedgerConfig, SqliteDocumentStore};

const SQLITE_FILE_NAME: &str = "habits.db";

/// Get the default data directory with a fallback chain
fn get_default_data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let potential_paths = [
        dirs::home_dir().map(|p| p.join(".habit_ledger")),
        dirs::data_dir().map(|p| p.join("habit_ledger")),
        dirs::config_dir().map(|p| p.join("habit_ledger")),
        std::env::current_dir().ok().map(|p| p.join(".habit_ledger")),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() && is_writable(potential_path) {
            return Ok(potential_path.clone());
        }
    }

    let temp_path = std::env::temp_dir().join("habit_ledger");
    std::fs::create_dir_all(&temp_path)?;

    tracing::warn!("Using temporary directory for data: {}", temp_path.display());
    Ok(temp_path)
}

fn is_writable(dir: &Path) -> bool {
    let test_file = dir.join(".test_write");
    if std::fs::write(&test_file, "test").is_ok() {
        let _ = std::fs::remove_file(&test_file);
        true
    } else {
        false
    }
}

/// Command line arguments for the habit ledger server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the ledger's documents and config.toml
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Path to a TOML config file (defaults to <data-dir>/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storage backend, overriding the config file: json or sqlite
    #[arg(long)]
    backend: Option<Backend>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("habit_ledger={}", log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // stdout is reserved for responses
        .init();

    info!("Starting habit ledger server");

    let data_dir = match args.data_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            dir
        }
        None => get_default_data_dir()?,
    };

    let mut config = match args.config {
        Some(path) => LedgerConfig::load(&path)?,
        None => LedgerConfig::load_or_default(&data_dir.join(CONFIG_FILE_NAME))?,
    };
    if let Some(backend) = args.backend {
        config.storage.backend = backend;
    }

    info!(
        "Using {:?} backend in: {}",
        config.storage.backend,
        data_dir.display()
    );

    match config.storage.backend {
        Backend::Json => {
            let store = JsonFileStore::open(data_dir.clone())?;
            McpServer::new(HabitLedger::new(store, config)).run().await?;
        }
        Backend::Sqlite => {
            let store = SqliteDocumentStore::open(&data_dir.join(SQLITE_FILE_NAME))?;
            McpServer::new(HabitLedger::new(store, config)).run().await?;
        }
    }

    info!("Habit ledger server shutdown complete");
    Ok(())
}
