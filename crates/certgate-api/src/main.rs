//! # certgate-api: Binary Entry Point
//!
//! Starts the Axum HTTP server.
//!
//! - `CERTGATE_CONFIG`: path to a YAML ledger config. Without it the
//!   ledger starts with defaults and `owner` as the writer.
//! - `CERTGATE_PORT`: port to bind (default 8080).

use std::path::PathBuf;

use anyhow::Context;
use certgate_api::state::{AppConfig, AppState};
use certgate_core::ActorId;
use certgate_registry::LedgerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;
    tracing::info!(
        writer = %config.ledger.writer,
        capacity = config.ledger.capacity,
        "ledger configured"
    );

    let state = AppState::from_config(config.ledger).context("failed to initialise ledger")?;
    let app = certgate_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("certgate API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_config() -> anyhow::Result<AppConfig> {
    let port: u16 = std::env::var("CERTGATE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let ledger = match std::env::var_os("CERTGATE_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            LedgerConfig::from_yaml_file(&path)
                .with_context(|| format!("loading {}", path.display()))?
        }
        None => {
            tracing::warn!("CERTGATE_CONFIG not set, using defaults with writer `owner`");
            LedgerConfig::new(ActorId::new("owner")?)
        }
    };

    Ok(AppConfig { port, ledger })
}
