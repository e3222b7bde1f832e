//! Configuration error types

use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
///
/// All of these are fatal at setup time. The router never degrades an
/// invalid level or granularity to a default.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Level selector names a level that does not exist
    #[error("unknown log level '{name}'")]
    UnknownLevel {
        /// The unrecognized level name
        name: String,
    },

    /// Rotation granularity token is not one of s/m/h/d/w
    #[error("unsupported rotation granularity '{token}'")]
    UnknownGranularity {
        /// The unrecognized token
        token: String,
    },

    /// A settings field holds a value that cannot be used
    #[error("invalid {field}: {message}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Error message
        message: String,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

impl ConfigError {
    /// Create an UnknownLevel error
    pub fn unknown_level(name: impl Into<String>) -> Self {
        Self::UnknownLevel { name: name.into() }
    }

    /// Create an UnknownGranularity error
    pub fn unknown_granularity(token: impl Into<String>) -> Self {
        Self::UnknownGranularity {
            token: token.into(),
        }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}
