#[cfg(test)]
use std::collections::HashMap;

/// Source of environment variables
///
/// Settings and secrets read through this trait instead of `std::env`, so
/// tests can supply values without touching the process environment.
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production environment provider that reads from system environment
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Test environment provider with configurable variables
#[cfg(test)]
#[derive(Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvironment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_vars(mut self, vars: &[(&str, &str)]) -> Self {
        for (key, value) in vars {
            self.vars.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Environment carrying valid values for every required secret
    pub fn with_test_secrets() -> Self {
        Self::empty().with_vars(&[
            ("JWT_SECRET", "test-secret-key-minimum-32-characters-long"),
            ("PASSWORD_PEPPER", "test-pepper-for-unit-tests"),
            ("REFRESH_TOKEN_SECRET", "test-refresh-secret-minimum-32-chars"),
        ])
    }
}

#[cfg(test)]
impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_environment_reads_process_env() {
        let provider = SystemEnvironment;

        unsafe {
            std::env::set_var("CINEMET_TEST_VAR_41", "test_value");
        }
        assert_eq!(provider.get_var("CINEMET_TEST_VAR_41"), Some("test_value".to_string()));
        assert_eq!(provider.get_var("CINEMET_MISSING_VAR_41"), None);
        unsafe {
            std::env::remove_var("CINEMET_TEST_VAR_41");
        }
    }

    #[test]
    fn test_mock_environment() {
        let provider = MockEnvironment::empty()
            .with_var("PORT", "8080")
            .with_vars(&[("HOST", "127.0.0.1"), ("LOG_LEVEL", "debug")]);

        assert_eq!(provider.get_var("PORT"), Some("8080".to_string()));
        assert_eq!(provider.get_var("HOST"), Some("127.0.0.1".to_string()));
        assert_eq!(provider.get_var("DATABASE_URL"), None);
    }
}
