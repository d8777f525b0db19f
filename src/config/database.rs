//! Store connection settings

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_POOL_SIZE: u32 = 100;

/// PostgreSQL holding `companies` and `subscription_payments`.
///
/// The acquire timeout must stay below the gateway's delivery timeout.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_pool_size")]
    pub max_connections: u32,

    /// Connections kept open while idle
    #[serde(default)]
    pub min_connections: u32,

    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Apply `migrations/` before serving
    #[serde(default)]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_pool_size(),
            min_connections: 0,
            acquire_timeout_secs: default_acquire_timeout(),
            run_migrations: false,
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// URL with credentials masked, for logging.
    pub fn redacted_url(&self) -> String {
        match (self.url.find("://"), self.url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}://***{}", &self.url[..scheme_end], &self.url[at..])
            }
            _ => self.url.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let scheme_ok = ["postgres://", "postgresql://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme));
        if self.url.is_empty() {
            Err(ValidationError::MissingRequired("SPOOLIQ__DATABASE__URL"))
        } else if !scheme_ok {
            Err(ValidationError::InvalidDatabaseUrl)
        } else if self.max_connections > MAX_POOL_SIZE {
            Err(ValidationError::PoolSizeTooLarge)
        } else if self.max_connections == 0 || self.min_connections > self.max_connections {
            Err(ValidationError::InvalidPoolSize)
        } else {
            Ok(())
        }
    }
}

fn default_pool_size() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    5
}
