use std::fmt;
use std::net::IpAddr;

use crate::config::{ApplicationError, EnvironmentProvider, SystemEnvironment};

const DEFAULT_DATABASE_URL: &str = "sqlite://cinemet.db?mode=rwc";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Infrastructure settings needed before anything else starts
pub struct BootstrapSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
}

impl BootstrapSettings {
    /// Load bootstrap settings from the given environment provider
    ///
    /// Every setting has a default; a value that is present but invalid is an error.
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ApplicationError> {
        let database_url = env
            .get_var("DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        if database_url.trim().is_empty() {
            return Err(ApplicationError::InvalidSetting {
                setting_name: "DATABASE_URL".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        let server_host = env
            .get_var("HOST")
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        Self::validate_host(&server_host)?;

        let server_port = match env.get_var("PORT") {
            Some(value) => Self::parse_port(&value)?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            database_url,
            server_host,
            server_port,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    fn validate_host(host: &str) -> Result<(), ApplicationError> {
        let is_hostname = !host.is_empty()
            && host
                .split('.')
                .all(|label| !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
        if host.parse::<IpAddr>().is_ok() || is_hostname {
            Ok(())
        } else {
            Err(ApplicationError::InvalidSetting {
                setting_name: "HOST".to_string(),
                reason: format!("'{}' is not a valid IP address or hostname", host),
            })
        }
    }

    fn parse_port(value: &str) -> Result<u16, ApplicationError> {
        let port: u16 = value.trim().parse().map_err(|e: std::num::ParseIntError| ApplicationError::ParseError {
            setting_name: "PORT".to_string(),
            error: e.to_string(),
        })?;
        if port == 0 {
            return Err(ApplicationError::InvalidSetting {
                setting_name: "PORT".to_string(),
                reason: "must be between 1 and 65535".to_string(),
            });
        }
        Ok(port)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}
