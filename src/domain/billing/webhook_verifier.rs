//! Gateway webhook signature verification.
//!
//! The gateway signs each callback with HMAC-SHA256 over the raw request
//! body and sends the hex digest in a header. There is no timestamp in the
//! signed material, so replay protection rests on the idempotent ledger.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Verifier for Asaas webhook signatures.
///
/// Constructed with an empty secret, the verifier is disabled and callers
/// skip the signature check entirely.
pub struct AsaasWebhookVerifier {
    secret: Secret<String>,
}

impl AsaasWebhookVerifier {
    /// Creates a verifier for the given shared secret.
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret }
    }

    /// True when a secret is configured and signatures must be checked.
    pub fn is_enabled(&self) -> bool {
        !self.secret.expose_secret().is_empty()
    }

    /// Checks `signature` (hex, any case) against the HMAC of `payload`.
    ///
    /// A token that is not valid hex is treated as a mismatch.
    pub fn verify(&self, payload: &[u8], signature: &str) -> bool {
        let valid = match (hex::decode(signature.trim()), self.compute_signature(payload)) {
            (Ok(provided), Some(expected)) => constant_time_compare(&expected, &provided),
            _ => false,
        };
        tracing::debug!(valid, "webhook signature checked");
        valid
    }

    fn compute_signature(&self, payload: &[u8]) -> Option<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes()).ok()?;
        mac.update(payload);
        Some(mac.finalize().into_bytes().to_vec())
    }
}

impl std::fmt::Debug for AsaasWebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsaasWebhookVerifier")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes the hex signature the gateway would send for `payload`.
///
/// Used by test fixtures to sign request bodies.
pub fn sign_payload(secret: &str, payload: &[u8]) -> String {
    match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mut mac) => {
            mac.update(payload);
            hex::encode(mac.finalize().into_bytes())
        }
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "whsec_spooliq_test";
    const BODY: &[u8] = br#"{"event":"PAYMENT_RECEIVED","payment":{"id":"pay_1"}}"#;

    fn verifier(secret: &str) -> AsaasWebhookVerifier {
        AsaasWebhookVerifier::new(Secret::new(secret.to_string()))
    }

    // ══════════════════════════════════════════════════════════════
    // Enablement
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn empty_secret_disables_verification() {
        assert!(!verifier("").is_enabled());
    }

    #[test]
    fn configured_secret_enables_verification() {
        assert!(verifier(TEST_SECRET).is_enabled());
    }

    // ══════════════════════════════════════════════════════════════
    // Verification
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn accepts_matching_signature() {
        let signature = sign_payload(TEST_SECRET, BODY);
        assert!(verifier(TEST_SECRET).verify(BODY, &signature));
    }

    #[test]
    fn accepts_uppercase_hex() {
        let signature = sign_payload(TEST_SECRET, BODY).to_uppercase();
        assert!(verifier(TEST_SECRET).verify(BODY, &signature));
    }

    #[test]
    fn rejects_tampered_body() {
        let signature = sign_payload(TEST_SECRET, BODY);
        let tampered = br#"{"event":"PAYMENT_RECEIVED","payment":{"id":"pay_2"}}"#;
        assert!(!verifier(TEST_SECRET).verify(tampered, &signature));
    }

    #[test]
    fn rejects_signature_from_other_secret() {
        let signature = sign_payload("another_secret", BODY);
        assert!(!verifier(TEST_SECRET).verify(BODY, &signature));
    }

    #[test]
    fn rejects_non_hex_token() {
        assert!(!verifier(TEST_SECRET).verify(BODY, "not-hex-at-all"));
    }

    #[test]
    fn rejects_truncated_signature() {
        let signature = sign_payload(TEST_SECRET, BODY);
        assert!(!verifier(TEST_SECRET).verify(BODY, &signature[..32]));
    }

    #[test]
    fn rejects_empty_token() {
        assert!(!verifier(TEST_SECRET).verify(BODY, ""));
    }

    #[test]
    fn debug_output_hides_secret() {
        let output = format!("{:?}", verifier(TEST_SECRET));
        assert!(!output.contains(TEST_SECRET));
        assert!(output.contains("enabled: true"));
    }

    // ══════════════════════════════════════════════════════════════
    // Constant Time Compare
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn constant_time_compare_requires_equal_length() {
        assert!(!constant_time_compare(b"abc", b"abcd"));
        assert!(constant_time_compare(b"abcd", b"abcd"));
        assert!(!constant_time_compare(b"abcd", b"abce"));
    }
}
