//! agrodash: live sensor-network dashboard fed by push events.
//!
//! Reads newline-delimited JSON events on stdin.
//! Run with:  `RUST_LOG=info agrodash < events.jsonl`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("agrodash v{} starting", env!("CARGO_PKG_VERSION"));

    let config = agro_config::load(agro_config::default_path())?;
    agro_dashboard::run(config).await.map_err(Into::into)
}
