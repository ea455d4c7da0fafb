use anyhow::Result;
use request_tracker::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH_VAR: &str = "REQUEST_TRACKER_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("request_tracker=info,tower_http=info")),
        )
        .init();

    let config = load_config()?;
    let addr = config.server.bind_address();
    let store = open_store(&config).await?;

    ServerBuilder::new()
        .with_config(config)
        .with_shared_store(store)
        .serve(&addr)
        .await
}

fn load_config() -> Result<ServiceConfig> {
    let config = match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            ServiceConfig::from_yaml_file(&path)?
        }
        Err(_) => ServiceConfig::default(),
    };

    config.apply_env_overrides()
}

async fn open_store(config: &ServiceConfig) -> Result<Arc<dyn RequestStore>> {
    match config.storage.backend {
        StorageBackend::InMemory => {
            tracing::info!("Using in-memory request store");
            Ok(Arc::new(InMemoryRequestStore::new()))
        }
        #[cfg(feature = "mongodb_backend")]
        StorageBackend::Mongodb => {
            let store =
                MongoRequestStore::connect(&config.storage.uri, &config.storage.database).await?;
            store.ensure_indexes().await?;
            tracing::info!(database = %config.storage.database, "Using MongoDB request store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "mongodb_backend"))]
        StorageBackend::Mongodb => Err(anyhow::anyhow!(
            "storage backend 'mongodb' requires the `mongodb_backend` feature"
        )),
    }
}
