//! Taskboard Server
//!
//! REST API over a SQLite-backed task table and an in-memory device
//! collection.

mod config;
mod error;
mod handlers;
mod server;
mod state;

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use taskboard_core::{Database, DeviceStore, TaskStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskboard-server", about = "Taskboard REST API server")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "taskboard.toml")]
    config: PathBuf,

    /// Listen address override
    #[arg(short, long, env = "TASKBOARD_LISTEN")]
    listen: Option<String>,

    /// Port override, keeps the configured host
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Database path override (":memory:" for a throwaway database)
    #[arg(short, long, env = "TASKBOARD_DATABASE")]
    database: Option<PathBuf>,
}

fn open_database(cfg: &config::ServerConfig) -> anyhow::Result<Database> {
    let db = if cfg.uses_in_memory_database() {
        tracing::warn!("Using in-memory database, tasks will not persist");
        Database::in_memory()?
    } else {
        Database::open(&cfg.database_path)?
    };
    db.set_busy_timeout(Duration::from_millis(cfg.busy_timeout_ms))?;
    db.initialize_schema()?;
    Ok(db)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut cfg = if cli.config.exists() {
        config::ServerConfig::load(&cli.config)?
    } else {
        tracing::info!("No config file found, using defaults");
        config::ServerConfig::default()
    };

    if let Some(listen) = cli.listen {
        cfg.listen_addr = listen;
    }
    if let Some(port) = cli.port {
        cfg.set_port(port);
    }
    if let Some(database) = cli.database {
        cfg.database_path = database;
    }

    let db = open_database(&cfg).inspect_err(|e| {
        tracing::error!("Failed to initialize database: {}", e);
    })?;
    tracing::info!("Database ready at {}", cfg.database_path.display());

    let devices = if cfg.seed_devices {
        DeviceStore::with_demo_devices()
    } else {
        DeviceStore::new()
    };
    let state = state::AppState::new(TaskStore::new(db.shared()), devices);
    let app = server::build_router(state, &cfg);

    tracing::info!("Starting taskboard server on {}", cfg.listen_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
