//! vigil — a headless monitoring dashboard that keeps a rolling window of
//! host metrics and logs gauge, health and trend summaries.
//!
//! Run with:  `RUST_LOG=info vigil`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("vigil v{} starting", env!("CARGO_PKG_VERSION"));

    vigil_runtime::run().await.map_err(Into::into)
}
