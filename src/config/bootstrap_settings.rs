use std::fmt;
use std::sync::Arc;

use crate::config::EnvironmentProvider;
use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ConfigError;

/// Infrastructure settings read once at startup
pub struct BootstrapSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
    cookie_secure: bool,
}

impl BootstrapSettings {
    /// Load bootstrap settings through the given environment provider
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, ConfigError> {
        let database_url = ConfigSpec::new(env_provider.clone())
            .env_override("DATABASE_URL")
            .default_value("sqlite://directory.db?mode=rwc")
            .min_length(1)
            .validator(ConfigSpec::validate_database_url)
            .load_setting_with_source()?
            .value;

        let server_host = ConfigSpec::new(env_provider.clone())
            .env_override("HOST")
            .default_value("0.0.0.0")
            .validator(ConfigSpec::validate_host_address)
            .load_setting_with_source()?
            .value;

        let port_value = ConfigSpec::new(env_provider.clone())
            .env_override("PORT")
            .default_value("3000")
            .load_setting_with_source()?
            .value;
        let server_port = ConfigSpec::parse_port(&port_value, "PORT")?;

        let cookie_secure_value = ConfigSpec::new(env_provider)
            .env_override("COOKIE_SECURE")
            .default_value("true")
            .load_setting_with_source()?
            .value;
        let cookie_secure = ConfigSpec::parse_bool(&cookie_secure_value, "COOKIE_SECURE")?;

        Ok(Self {
            database_url,
            server_host,
            server_port,
            cookie_secure,
        })
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

    /// Whether the refresh cookie carries the `Secure` attribute
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    fn create_test_env(vars: &[(&str, &str)]) -> Arc<dyn EnvironmentProvider + Send + Sync> {
        Arc::new(MockEnvironment::empty().with_vars(vars))
    }

    #[test]
    fn test_bootstrap_settings_with_all_vars() {
        let env_provider = create_test_env(&[
            ("DATABASE_URL", "sqlite://test.db"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("COOKIE_SECURE", "false"),
        ]);

        let settings = BootstrapSettings::from_env_provider(env_provider).unwrap();

        assert_eq!(settings.database_url(), "sqlite://test.db");
        assert_eq!(settings.server_address(), "127.0.0.1:8080");
        assert!(!settings.cookie_secure());
    }

    #[test]
    fn test_bootstrap_settings_with_defaults() {
        let settings = BootstrapSettings::from_env_provider(create_test_env(&[])).unwrap();

        assert_eq!(settings.database_url(), "sqlite://directory.db?mode=rwc");
        assert_eq!(settings.server_host(), "0.0.0.0");
        assert_eq!(settings.server_port(), 3000);
        assert!(settings.cookie_secure());
    }

    #[test]
    fn test_bootstrap_settings_empty_host_fails_validation() {
        let result = BootstrapSettings::from_env_provider(create_test_env(&[("HOST", "")]));

        match result {
            Err(ConfigError::InvalidSetting { setting_name, reason }) => {
                assert_eq!(setting_name, "HOST");
                assert!(reason.contains("cannot be empty"));
            }
            other => panic!("Expected InvalidSetting for HOST, got: {:?}", other),
        }
    }

    #[test]
    fn test_bootstrap_settings_invalid_port() {
        let result = BootstrapSettings::from_env_provider(create_test_env(&[("PORT", "not_a_number")]));

        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_bootstrap_settings_unsupported_database() {
        let result = BootstrapSettings::from_env_provider(create_test_env(&[(
            "DATABASE_URL",
            "mysql://localhost/directory",
        )]));

        assert!(result.is_err());
    }
}
