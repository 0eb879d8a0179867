use clap::Parser;
use tracing_subscriber::EnvFilter;

use crm_api_rust::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("crm_api_rust=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    cli::run(cli).await
}
