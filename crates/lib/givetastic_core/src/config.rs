//! Store selection.
//!
//! The backend is chosen once, when the application is composed:
//!
//! | Variable           | Effect                                          |
//! |--------------------|-------------------------------------------------|
//! | `GIVETASTIC_STORE` | `fallback`, `memory` or `postgres`              |
//! | `DATABASE_URL`     | PostgreSQL URL; implies `postgres` when set     |
//!
//! With neither set the application runs in fallback mode.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::{info, warn};

use crate::store::fallback::FallbackAccessStore;
use crate::store::memory::{MemoryAccessStore, MemoryIdentityStore};
use crate::store::postgres::{PgAccessStore, PgIdentityStore};
use crate::store::{AccessStore, IdentityStore};

pub const STORE_ENV: &str = "GIVETASTIC_STORE";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown store backend: {0} (expected fallback, memory or postgres)")]
    UnknownBackend(String),

    #[error("DATABASE_URL must be set for the postgres store")]
    MissingDatabaseUrl,

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Fallback,
    Memory,
    Postgres,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StoreBackend::Fallback => "fallback",
            StoreBackend::Memory => "memory",
            StoreBackend::Postgres => "postgres",
        })
    }
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" | "mock" => Ok(StoreBackend::Fallback),
            "memory" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

/// Which store to build and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::fallback()
    }
}

impl StoreConfig {
    pub fn fallback() -> Self {
        Self {
            backend: StoreBackend::Fallback,
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ..Self::fallback()
        }
    }

    pub fn postgres(database_url: impl Into<String>) -> Self {
        Self {
            backend: StoreBackend::Postgres,
            database_url: Some(database_url.into()),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var(STORE_ENV).ok(),
            std::env::var(DATABASE_URL_ENV).ok(),
        )
    }

    /// Resolve from explicit `GIVETASTIC_STORE` / `DATABASE_URL` values.
    pub fn from_vars(
        store: Option<String>,
        database_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let database_url = database_url.filter(|u| !u.trim().is_empty());
        let backend = match store.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => name.parse()?,
            None if database_url.is_some() => StoreBackend::Postgres,
            None => {
                warn!(
                    "neither {STORE_ENV} nor {DATABASE_URL_ENV} is set; running in fallback mode"
                );
                StoreBackend::Fallback
            }
        };

        if backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        Ok(Self {
            backend,
            database_url,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        })
    }

    /// Build the configured stores, connecting and migrating for postgres.
    pub async fn connect(&self) -> Result<Stores, ConfigError> {
        match self.backend {
            StoreBackend::Fallback => Ok(Stores::fallback()),
            StoreBackend::Memory => Ok(Stores::memory()),
            StoreBackend::Postgres => {
                let url = self
                    .database_url
                    .as_deref()
                    .ok_or(ConfigError::MissingDatabaseUrl)?;
                info!(max_connections = self.max_connections, "connecting to postgres");
                let pool = PgPoolOptions::new()
                    .max_connections(self.max_connections)
                    .acquire_timeout(ACQUIRE_TIMEOUT)
                    .connect(url)
                    .await?;
                crate::migrate::migrate(&pool).await?;
                Ok(Stores {
                    access: Arc::new(PgAccessStore::new(pool.clone())),
                    identity: Some(Arc::new(PgIdentityStore::new(pool))),
                })
            }
        }
    }
}

/// The pair of store capabilities handed to the registry and the entry flow.
#[derive(Clone)]
pub struct Stores {
    pub access: Arc<dyn AccessStore>,
    pub identity: Option<Arc<dyn IdentityStore>>,
}

impl Stores {
    pub fn fallback() -> Self {
        Self {
            access: Arc::new(FallbackAccessStore::new()),
            identity: None,
        }
    }

    pub fn memory() -> Self {
        Self {
            access: Arc::new(MemoryAccessStore::new()),
            identity: Some(Arc::new(MemoryIdentityStore::new())),
        }
    }
}
