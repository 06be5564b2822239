use std::fmt;

use crate::config::{EnvironmentProvider, SecretError, SystemEnvironment};

/// A secret read from the environment with a minimum length
struct SecretSpec {
    name: &'static str,
    min_length: usize,
}

const JWT_SECRET: SecretSpec = SecretSpec { name: "JWT_SECRET", min_length: 32 };
const PASSWORD_PEPPER: SecretSpec = SecretSpec { name: "PASSWORD_PEPPER", min_length: 16 };
const REFRESH_TOKEN_SECRET: SecretSpec = SecretSpec { name: "REFRESH_TOKEN_SECRET", min_length: 32 };

/// Centralized manager for application secrets
///
/// All secrets are required; loading fails fast on the first missing or
/// too-short value. Values never appear in `Debug` or `Display` output.
pub struct SecretManager {
    jwt_secret: String,
    password_pepper: String,
    refresh_token_secret: String,
}

impl SecretManager {
    /// Load secrets from the process environment
    pub fn init() -> Result<Self, SecretError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    /// Load and validate all secrets from the given provider
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, SecretError> {
        Ok(Self {
            jwt_secret: Self::load_secret(env, &JWT_SECRET)?,
            password_pepper: Self::load_secret(env, &PASSWORD_PEPPER)?,
            refresh_token_secret: Self::load_secret(env, &REFRESH_TOKEN_SECRET)?,
        })
    }

    fn load_secret(env: &dyn EnvironmentProvider, spec: &SecretSpec) -> Result<String, SecretError> {
        let value = env
            .get_var(spec.name)
            .ok_or_else(|| SecretError::missing(spec.name))?;

        let length = value.chars().count();
        if length < spec.min_length {
            return Err(SecretError::invalid_length(spec.name, spec.min_length, length));
        }

        Ok(value)
    }

    /// Get the JWT signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Get the pepper for password hashing
    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    /// Get the HMAC key for refresh token hashing
    pub fn refresh_token_secret(&self) -> &str {
        &self.refresh_token_secret
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 3 }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    #[test]
    fn test_successful_initialization_with_valid_secrets() {
        let env = MockEnvironment::with_test_secrets();

        let manager = SecretManager::from_env_provider(&env).unwrap();

        assert_eq!(manager.jwt_secret(), "test-secret-key-minimum-32-characters-long");
        assert_eq!(manager.password_pepper(), "test-pepper-for-unit-tests");
        assert_eq!(manager.refresh_token_secret(), "test-refresh-secret-minimum-32-chars");
    }

    #[test]
    fn test_error_when_secret_missing() {
        let env = MockEnvironment::empty()
            .with_var("JWT_SECRET", "this-is-a-valid-jwt-secret-with-32-characters");

        let err = SecretManager::from_env_provider(&env).unwrap_err();
        assert_eq!(err, SecretError::missing("PASSWORD_PEPPER"));
    }

    #[test]
    fn test_error_when_secret_too_short() {
        let env = MockEnvironment::with_test_secrets().with_var("JWT_SECRET", "short");

        let err = SecretManager::from_env_provider(&env).unwrap_err();
        assert_eq!(err, SecretError::invalid_length("JWT_SECRET", 32, 5));
        assert_eq!(err.to_string(), "Secret 'JWT_SECRET' must be at least 32 characters, got 5");
    }

    #[test]
    fn test_debug_and_display_redact_values() {
        let manager = SecretManager::from_env_provider(&MockEnvironment::with_test_secrets()).unwrap();

        let debug = format!("{:?}", manager);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("test-secret-key"));
        assert!(!format!("{}", manager).contains("test-pepper"));
    }
}
