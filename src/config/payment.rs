//! Payment gateway configuration (Asaas)

use http::HeaderName;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Payment gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Shared secret for webhook HMAC verification. Empty disables the check.
    #[serde(default = "empty_secret")]
    pub asaas_webhook_secret: Secret<String>,

    /// Header carrying the hex HMAC of the body
    #[serde(default = "default_signature_header")]
    pub asaas_signature_header: String,
}

impl PaymentConfig {
    pub fn verification_enabled(&self) -> bool {
        !self.asaas_webhook_secret.expose_secret().is_empty()
    }

    /// Validate payment configuration
    ///
    /// Unsigned webhooks are tolerated outside production only.
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        if HeaderName::from_bytes(self.asaas_signature_header.as_bytes()).is_err() {
            return Err(ValidationError::InvalidSignatureHeader(
                self.asaas_signature_header.clone(),
            ));
        }
        if environment == Environment::Production && !self.verification_enabled() {
            return Err(ValidationError::WebhookSecretRequired);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            asaas_webhook_secret: empty_secret(),
            asaas_signature_header: default_signature_header(),
        }
    }
}

fn empty_secret() -> Secret<String> {
    Secret::new(String::new())
}

fn default_signature_header() -> String {
    "Asaas-Signature".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_secret(secret: &str) -> PaymentConfig {
        PaymentConfig {
            asaas_webhook_secret: Secret::new(secret.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = PaymentConfig::default();
        assert_eq!(config.asaas_signature_header, "Asaas-Signature");
        assert!(!config.verification_enabled());
    }

    #[test]
    fn test_missing_secret_allowed_in_development() {
        let config = PaymentConfig::default();
        assert!(config.validate(Environment::Development).is_ok());
    }

    #[test]
    fn test_missing_secret_rejected_in_production() {
        let config = PaymentConfig::default();
        assert_eq!(
            config.validate(Environment::Production),
            Err(ValidationError::WebhookSecretRequired)
        );
    }

    #[test]
    fn test_secret_satisfies_production() {
        let config = with_secret("whk_live_123");
        assert!(config.verification_enabled());
        assert!(config.validate(Environment::Production).is_ok());
    }

    #[test]
    fn test_invalid_header_name() {
        let config = PaymentConfig {
            asaas_signature_header: "Asaas Signature".to_string(),
            ..with_secret("whk_live_123")
        };
        assert!(matches!(
            config.validate(Environment::Development),
            Err(ValidationError::InvalidSignatureHeader(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = with_secret("whk_live_123");
        assert!(!format!("{:?}", config).contains("whk_live_123"));
    }
}
