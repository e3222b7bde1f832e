//! Authentication configuration

use serde::Deserialize;

/// Authentication configuration
///
/// # Example
///
/// ```toml
/// [auth]
/// strict_login = true
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Enforce the single-session check: a token is only accepted while
    /// its embedded session tag matches the principal's stored tag
    /// Default: true
    pub strict_login: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { strict_login: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strict() {
        assert!(AuthConfig::default().strict_login);
    }

    #[test]
    fn test_deserialize() {
        let config: AuthConfig = toml::from_str("strict_login = false").unwrap();
        assert!(!config.strict_login);
    }
}
