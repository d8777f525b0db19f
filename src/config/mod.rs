//! Application configuration module
//!
//! Configuration is read from environment variables with the `SPOOLIQ`
//! prefix; nested values are separated by a double underscore.
//!
//! # Example
//!
//! ```no_run
//! use spooliq_billing::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod payment;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL store for tenants and the payment ledger
    pub database: DatabaseConfig,

    /// Asaas webhook settings
    #[serde(default)]
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// A `.env` file is read first when present.
    ///
    /// # Environment Variable Format
    ///
    /// - `SPOOLIQ__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SPOOLIQ__DATABASE__URL=...` -> `database.url = ...`
    /// - `SPOOLIQ__PAYMENT__ASAAS_WEBHOOK_SECRET=...` -> `payment.asaas_webhook_secret`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("SPOOLIQ")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first section that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate(self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 5] = [
        "SPOOLIQ__DATABASE__URL",
        "SPOOLIQ__SERVER__PORT",
        "SPOOLIQ__SERVER__ENVIRONMENT",
        "SPOOLIQ__PAYMENT__ASAAS_WEBHOOK_SECRET",
        "SPOOLIQ__PAYMENT__ASAAS_SIGNATURE_HEADER",
    ];

    fn set_minimal_env() {
        env::set_var("SPOOLIQ__DATABASE__URL", "postgresql://test@localhost/test");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let config = load_with(&[]).unwrap();

        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.payment.asaas_signature_header, "Asaas-Signature");
        assert!(!config.payment.verification_enabled());
    }

    #[test]
    fn test_server_defaults() {
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_validate_minimal_config() {
        let config = load_with(&[]).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_server_port() {
        let config = load_with(&[("SPOOLIQ__SERVER__PORT", "3000")]).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_webhook_settings_from_environment() {
        let config = load_with(&[
            ("SPOOLIQ__PAYMENT__ASAAS_WEBHOOK_SECRET", "whk_test_abc"),
            ("SPOOLIQ__PAYMENT__ASAAS_SIGNATURE_HEADER", "X-Asaas-Signature"),
        ])
        .unwrap();

        assert_eq!(config.payment.asaas_webhook_secret.expose_secret(), "whk_test_abc");
        assert_eq!(config.payment.asaas_signature_header, "X-Asaas-Signature");
    }

    #[test]
    fn test_production_without_secret_fails_validation() {
        let config = load_with(&[("SPOOLIQ__SERVER__ENVIRONMENT", "production")]).unwrap();

        assert!(config.is_production());
        assert_eq!(config.validate(), Err(ValidationError::WebhookSecretRequired));
    }
}
