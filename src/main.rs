use kmrl_backend::config::AppConfig;
use kmrl_backend::db::{PgDocumentStore, SharedStore};
use kmrl_backend::server;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config
    let config = AppConfig::load()?;

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .init();

    info!("Starting KMRL backend...");

    // Init store, once for the whole process
    let store: SharedStore = Arc::new(PgDocumentStore::connect(&config).await);

    server::serve(&config.listen_addr(), store).await?;

    Ok(())
}
