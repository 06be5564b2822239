use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use crate::errors::InternalError;

type HmacSha256 = Hmac<Sha256>;

/// Stateless cryptographic helpers: keyed token hashing and password generation
#[derive(Debug, Default)]
pub struct CryptoProvider;

impl CryptoProvider {
    pub fn new() -> Self {
        Self
    }

    /// HMAC-SHA256 of `token` under `key`, hex encoded
    pub fn hmac_sha256_token(&self, key: &str, token: &str) -> Result<String, InternalError> {
        let mut mac = HmacSha256::new_from_slice(key.as_bytes())
            .map_err(|e| InternalError::crypto("hmac_init", e.to_string()))?;
        mac.update(token.as_bytes());
        Ok(format!("{:x}", mac.finalize().into_bytes()))
    }

    /// Random 20-character password for accounts created from the CLI
    ///
    /// Always mixes letters and symbols so it passes the password policy.
    pub fn generate_secure_password(&self) -> String {
        const PASSWORD_LENGTH: usize = 20;
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

        let mut rng = rand::rng();
        let mut password: String = (0..PASSWORD_LENGTH - 1)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect();
        // Guarantees at least one letter
        password.insert(rng.random_range(0..PASSWORD_LENGTH), (b'a' + rng.random_range(0..26)) as char);
        password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_sha256_token_is_deterministic_hex() {
        let crypto = CryptoProvider::new();

        let hash1 = crypto.hmac_sha256_token("test-secret-key", "token").unwrap();
        let hash2 = crypto.hmac_sha256_token("test-secret-key", "token").unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert!(hash1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hmac_sha256_token_depends_on_key_and_token() {
        let crypto = CryptoProvider::new();

        let hash = |key: &str, token: &str| crypto.hmac_sha256_token(key, token).unwrap();

        assert_ne!(hash("key1", "token"), hash("key2", "token"));
        assert_ne!(hash("key", "token1"), hash("key", "token2"));
    }

    #[test]
    fn test_generate_secure_password() {
        let crypto = CryptoProvider::new();

        let password = crypto.generate_secure_password();
        assert_eq!(password.chars().count(), 20);
        assert!(password.chars().any(|c| c.is_ascii_alphabetic()));
        assert_ne!(password, crypto.generate_secure_password());
    }
}
