use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Loads `.env` and installs a subscriber logging `exe` and this crate by default.
pub fn init(exe: &str) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "{exe}=trace,composable_tower_chain=trace,tower_http=debug"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("Failed to set global tracing subscriber")
}

pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Serves `app` with request tracing on `LISTEN_ADDR`.
pub async fn serve(app: axum::Router<()>) -> anyhow::Result<()> {
    let socket_addr = env_or("LISTEN_ADDR", "127.0.0.1:5000")
        .parse::<SocketAddr>()
        .context("Invalid LISTEN_ADDR")?;

    let listener = TcpListener::bind(&socket_addr)
        .await
        .context("Bind failed")?;

    tracing::info!(%socket_addr, "Starting server");

    axum::serve(listener, app.layer(TraceLayer::new_for_http()))
        .await
        .context("Server failed")
}
