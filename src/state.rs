use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, warn};

use crate::auth::jwt::SessionKeys;
use crate::config::AppConfig;
use crate::store::{CredentialStore, MemoryStore, PgStore};

/// Shared request state. Built once in `main`, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub keys: SessionKeys,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connect the store named by `DATABASE_URL` and run migrations.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        if config.uses_memory_store() {
            warn!("using in-memory store; data is lost on shutdown");
            return Ok(Self::in_memory(config));
        }

        let store = PgStore::connect(&config.database_url, config.max_connections).await?;
        if let Err(e) = store.migrate().await {
            warn!(error = %e, "migration failed; continuing");
        }
        info!("database connected");

        Ok(Self::from_parts(Arc::new(store), config))
    }

    pub fn in_memory(config: AppConfig) -> Self {
        Self::from_parts(Arc::new(MemoryStore::new()), config)
    }

    pub fn from_parts(store: Arc<dyn CredentialStore>, config: AppConfig) -> Self {
        Self {
            store,
            keys: SessionKeys::from_config(&config.jwt),
            config: Arc::new(config),
        }
    }

    /// Release the store. Call after the server has stopped accepting requests.
    pub async fn close(&self) {
        self.store.close().await;
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}
