/// Source of environment variables
///
/// Injected everywhere configuration is read so tests can supply values
/// without touching the process environment.
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment for unit tests
#[cfg(test)]
#[derive(Default)]
pub struct MockEnvironment {
    vars: std::collections::HashMap<String, String>,
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

    pub fn with_vars(self, vars: &[(&str, &str)]) -> Self {
        vars.iter().fold(self, |env, (key, value)| env.with_var(key, value))
    }

    /// Environment carrying valid values for every required secret
    pub fn with_test_secrets() -> Self {
        Self::empty().with_vars(&[
            ("JWT_SECRET", "test-jwt-secret-that-is-at-least-32-characters"),
            ("PASSWORD_PEPPER", "test-pepper-16chars"),
            ("REFRESH_TOKEN_SECRET", "test-refresh-secret-at-least-32-characters"),
            ("COOKIE_SECURE", "false"),
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

        // PATH is set in every test runner we use
        assert!(provider.get_var("PATH").is_some());
        assert_eq!(provider.get_var("LOCALBIZ_NON_EXISTENT_VAR_98765"), None);
    }

    #[test]
    fn test_mock_environment_with_vars() {
        let provider = MockEnvironment::empty()
            .with_var("KEY1", "value1")
            .with_vars(&[("KEY2", "value2"), ("KEY1", "overridden")]);

        assert_eq!(provider.get_var("KEY1"), Some("overridden".to_string()));
        assert_eq!(provider.get_var("KEY2"), Some("value2".to_string()));
        assert_eq!(provider.get_var("KEY3"), None);
    }
}
