//! Store selection by configured provider.

use std::sync::Arc;

use tracing::info;

use resqroute_core::config::{DatabaseConfig, DatabaseProvider};
use resqroute_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::{MemoryActivityStore, MemoryAlertStore, MemoryUserStore};
use crate::migration::run_migrations;
use crate::repositories::{ActivityRepository, AlertRepository, UserRepository};
use crate::store::{ActivityStore, AlertStore, UserStore};

/// The set of stores the services are built from.
#[derive(Debug, Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub alerts: Arc<dyn AlertStore>,
    pub activity: Arc<dyn ActivityStore>,
    /// Present only for the PostgreSQL provider.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Build the stores for the configured provider, connecting and migrating
    /// when PostgreSQL is selected.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            DatabaseProvider::Postgres => {
                let db = DatabasePool::connect(config).await?;
                if config.auto_migrate {
                    run_migrations(db.pool()).await?;
                }
                Ok(Self::postgres(db))
            }
            DatabaseProvider::Memory => {
                info!("Using in-memory stores; data is lost on restart");
                Ok(Self::in_memory())
            }
        }
    }

    /// Stores backed by an existing PostgreSQL pool.
    pub fn postgres(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            alerts: Arc::new(AlertRepository::new(pool.clone())),
            activity: Arc::new(ActivityRepository::new(pool)),
            pool: Some(db),
        }
    }

    /// Fresh, empty in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::new()),
            alerts: Arc::new(MemoryAlertStore::new()),
            activity: Arc::new(MemoryActivityStore::new()),
            pool: None,
        }
    }

    /// Name of the active provider, for health output.
    pub fn provider_name(&self) -> &'static str {
        if self.pool.is_some() { "postgres" } else { "memory" }
    }

    /// Whether the backing database answers. Always true in memory mode.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(db) => db.health_check().await,
            None => Ok(true),
        }
    }

    /// Close the pool, if any.
    pub async fn close(&self) {
        if let Some(db) = &self.pool {
            db.close().await;
        }
    }
}
