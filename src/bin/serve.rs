//! HTTP server binary for the textlens search engine.

use anyhow::Result;
use textlens::{build_app, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = ServerConfig::from_env();
    let state = AppState::new(config.metrics_enabled);
    let app = build_app(state);

    let addr = config.addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, metrics_enabled = config.metrics_enabled, "textlens listening");
    axum::serve(listener, app).await?;
    Ok(())
}
