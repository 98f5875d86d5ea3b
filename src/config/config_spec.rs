use std::sync::Arc;

use crate::config::EnvironmentProvider;
use crate::config::errors::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValueSource {
    EnvironmentVariable { name: String },
    Default,
}

#[derive(Debug, Clone)]
pub struct ConfigValue {
    pub value: String,
    pub source: ConfigValueSource,
}

/// Configuration specification with environment override → default priority
pub struct ConfigSpec {
    env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    pub env_override: Option<String>,
    pub default_value: Option<String>,
    pub required: bool,
    pub min_length: Option<usize>,
    pub validator: Option<fn(&str) -> Result<(), String>>,
}

impl ConfigSpec {
    pub fn new(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Self {
        Self {
            env_provider,
            env_override: None,
            default_value: None,
            required: false,
            min_length: None,
            validator: None,
        }
    }

    pub fn env_override(mut self, name: &str) -> Self {
        self.env_override = Some(name.to_string());
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn validator(mut self, f: fn(&str) -> Result<(), String>) -> Self {
        self.validator = Some(f);
        self
    }

    fn setting_name(&self) -> &str {
        self.env_override.as_deref().unwrap_or("unknown_setting")
    }

    /// Load a setting value with source tracking
    ///
    /// The environment wins over the default. Both are validated.
    pub fn load_setting_with_source(&self) -> Result<ConfigValue, ConfigError> {
        if let Some(env_var) = &self.env_override {
            if let Some(value) = self.env_provider.get_var(env_var) {
                self.validate_value(&value, env_var)?;

                return Ok(ConfigValue {
                    value,
                    source: ConfigValueSource::EnvironmentVariable {
                        name: env_var.clone(),
                    },
                });
            }
        }

        if let Some(default) = &self.default_value {
            self.validate_value(default, self.setting_name())?;

            return Ok(ConfigValue {
                value: default.clone(),
                source: ConfigValueSource::Default,
            });
        }

        if self.required {
            return Err(ConfigError::invalid(
                self.setting_name(),
                "Required setting has no value from any source",
            ));
        }

        Ok(ConfigValue {
            value: String::new(),
            source: ConfigValueSource::Default,
        })
    }

    /// Validate a setting value according to the ConfigSpec rules
    pub fn validate_value(&self, value: &str, setting_name: &str) -> Result<(), ConfigError> {
        if let Some(min_len) = self.min_length {
            if value.len() < min_len {
                return Err(ConfigError::invalid(
                    setting_name,
                    format!("Value must be at least {} characters long", min_len),
                ));
            }
        }

        if let Some(validator) = self.validator {
            validator(value).map_err(|reason| ConfigError::invalid(setting_name, reason))?;
        }

        Ok(())
    }
}

/// Type parsing utilities for configuration values
impl ConfigSpec {
    /// Parse a boolean value from string
    ///
    /// Accepts true/false, 1/0, yes/no, on/off (case insensitive).
    pub fn parse_bool(value: &str, setting_name: &str) -> Result<bool, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::parse(
                setting_name,
                format!("Expected boolean value, got '{}'", value),
            )),
        }
    }

    /// Parse a port number from string, rejecting 0
    pub fn parse_port(value: &str, setting_name: &str) -> Result<u16, ConfigError> {
        let port = value.trim().parse::<u16>().map_err(|e| {
            ConfigError::parse(
                setting_name,
                format!("Expected port number (1-65535), got '{}': {}", value, e),
            )
        })?;

        if port == 0 {
            return Err(ConfigError::invalid(
                setting_name,
                "Port number must be between 1 and 65535",
            ));
        }

        Ok(port)
    }

    /// Validate a host address: non-empty, no whitespace, IPv6 in brackets
    pub fn validate_host_address(value: &str) -> Result<(), String> {
        let host = value.trim();

        if host.is_empty() {
            return Err("Host address cannot be empty".to_string());
        }

        if host.chars().any(char::is_whitespace) {
            return Err("Host address cannot contain whitespace characters".to_string());
        }

        if !host.starts_with('[') && host.matches(':').count() > 1 {
            return Err("IPv6 addresses must be enclosed in brackets [::1]".to_string());
        }

        Ok(())
    }

    /// Validate that a database URL names a backend this build can talk to
    pub fn validate_database_url(value: &str) -> Result<(), String> {
        const SCHEMES: [&str; 3] = ["sqlite:", "postgres://", "postgresql://"];

        if SCHEMES.iter().any(|scheme| value.starts_with(scheme)) {
            Ok(())
        } else {
            Err(format!(
                "Unsupported database URL '{}', expected sqlite: or postgres://",
                value
            ))
        }
    }
}
