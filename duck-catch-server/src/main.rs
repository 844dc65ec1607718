//! Duck Catch Gateway
//!
//! Serves the achievement list and records new achievements.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use duck_catch::{
    VERSION,
    config::GatewayConfig,
    network::{
        server::GatewayServer,
        store::{self, AchievementStore, SharedStore, UnavailableStore},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Duck Catch Gateway v{}", VERSION);

    let config = GatewayConfig::from_env().context("Invalid configuration")?;

    // Keep serving without a database: requests then fail with 500
    let store: SharedStore = match store::connect(&config.database_url).await {
        Ok(store) => store,
        Err(err) => {
            warn!("Store unavailable ({}), serving without persistence", err);
            Arc::new(UnavailableStore)
        }
    };
    info!("Store backend: {}", store.backend());

    GatewayServer::new(config, store)
        .run()
        .await
        .context("Gateway failed")?;

    Ok(())
}
