use std::fmt;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::prelude::*;
use uuid::Uuid;

use crate::config::SecretManager;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::CryptoProvider;
use crate::types::internal::auth::Claims;

/// Access token lifetime
pub const JWT_EXPIRATION_MINUTES: i64 = 15;
/// Refresh token lifetime
pub const REFRESH_EXPIRATION_DAYS: i64 = 7;

/// Provides JWT generation and validation plus refresh token operations
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    crypto_provider: CryptoProvider,
    jwt_expiration_minutes: i64,
    refresh_expiration_days: i64,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>) -> Self {
        Self {
            secret_manager,
            crypto_provider: CryptoProvider::new(),
            jwt_expiration_minutes: JWT_EXPIRATION_MINUTES,
            refresh_expiration_days: REFRESH_EXPIRATION_DAYS,
        }
    }

    /// Access token lifetime in seconds
    pub fn jwt_expires_in(&self) -> i64 {
        self.jwt_expiration_minutes * 60
    }

    /// Generate an HS256 JWT whose subject is the user id
    ///
    /// # Returns
    /// * `Ok((token, jti))` - Encoded JWT and its unique id
    /// * `Err(InternalError)` - Encoding failed
    pub fn generate_jwt(&self, user_id: i32) -> Result<(String, String), InternalError> {
        let now = Utc::now().timestamp();
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + self.jwt_expires_in(),
            iat: now,
            jti: Some(jti.clone()),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))?;

        tracing::debug!(user_id, jti = %jti, "JWT issued");
        Ok((token, jti))
    }

    /// Validate a JWT and return the claims
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => CredentialError::ExpiredToken("jwt".to_string()).into(),
            ErrorKind::InvalidSignature => {
                tracing::warn!("JWT with invalid signature rejected");
                CredentialError::invalid_token("jwt", "invalid signature").into()
            }
            _ => CredentialError::invalid_token("jwt", "malformed").into(),
        })
    }

    /// Generate a cryptographically secure refresh token
    ///
    /// # Returns
    /// * `String` - A base64-encoded random token (32 bytes)
    pub fn generate_refresh_token(&self) -> String {
        let mut rng = rand::rng();
        let random_bytes: [u8; 32] = rng.random();
        general_purpose::STANDARD.encode(random_bytes)
    }

    /// Hash a refresh token with HMAC-SHA256 under the refresh token secret
    pub fn hash_refresh_token(&self, token: &str) -> Result<String, InternalError> {
        self.crypto_provider
            .hmac_sha256_token(self.secret_manager.refresh_token_secret(), token)
    }

    /// Unix timestamp when a refresh token issued now expires
    pub fn get_refresh_expiration(&self) -> i64 {
        Utc::now().timestamp() + self.refresh_expiration_days * 24 * 60 * 60
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret_manager", &"<redacted>")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("refresh_expiration_days", &self.refresh_expiration_days)
            .finish()
    }
}

impl fmt::Display for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TokenProvider {{ jwt_expiration: {}min, refresh_expiration: {}days }}",
            self.jwt_expiration_minutes, self.refresh_expiration_days
        )
    }
}
