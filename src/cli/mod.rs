// cli/mod.rs - Command-line entry points for the server binary

use std::collections::HashMap;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use crate::config::{AppConfig, ConfigError, StoreBackend};
use crate::database::{open_store, DatabaseManager};
use crate::server::app;
use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "crm-api-rust")]
#[command(about = "CRM API - clients, projects and reminders per user account")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, global = true, help = "Use the in-memory store instead of PostgreSQL")]
    pub in_memory: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

impl Cli {
    /// Flag values expressed as the environment variables they replace.
    fn overrides(&self) -> HashMap<&'static str, String> {
        let mut vars = HashMap::new();
        if let Some(port) = self.port {
            vars.insert("CRM_API_PORT", port.to_string());
        }
        if self.in_memory {
            vars.insert("DATABASE_BACKEND", "memory".to_string());
        }
        vars
    }

    /// Environment configuration with command-line flags taking precedence.
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let overrides = self.overrides();
        AppConfig::from_lookup(|key| overrides.get(key).cloned().or_else(|| std::env::var(key).ok()))
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.load_config().context("invalid configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Migrate => migrate(config).await,
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting CRM API in {:?} mode", config.environment);
    if config.uses_development_secret() {
        tracing::warn!("JWT_SECRET not set; using the development secret");
    }

    let store = open_store(&config.database)
        .await
        .context("failed to open store")?;

    let bind_addr = config.bind_addr();
    let state = AppState::new(config, store.clone());

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("CRM API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn migrate(config: AppConfig) -> anyhow::Result<()> {
    if config.database.backend != StoreBackend::Postgres {
        bail!("migrations only apply to the postgres backend");
    }

    let pool = DatabaseManager::connect(&config.database).await?;
    DatabaseManager::migrate(&pool).await?;
    pool.close().await;

    tracing::info!("Migrations applied");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
