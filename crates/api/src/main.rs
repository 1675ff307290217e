//! Churn Prediction Service - Main Entry Point

use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("=== Churn Prediction Service v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Artifacts: {:?}", config.artifacts);

    run_server(config).await?;

    Ok(())
}
