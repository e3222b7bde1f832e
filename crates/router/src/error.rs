//! Router error types

use thiserror::Error;

use fanlog_config::ConfigError;
use fanlog_sinks::SinkError;

/// Result type for router operations
pub type Result<T> = std::result::Result<T, RouterError>;

/// Errors surfaced to the setup caller
///
/// Only configuration-time operations return these. Per-record failures
/// are contained inside the dispatch core and never reach the code that
/// issued the log call.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Invalid level selector, granularity, or format template
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Sink provisioning failed
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// A record or configure call referenced a base path never staged
    #[error("no sink target staged for '{path}'")]
    UnknownTarget {
        /// The unknown base path
        path: String,
    },
}

impl RouterError {
    /// Create an UnknownTarget error
    pub fn unknown_target(path: impl Into<String>) -> Self {
        Self::UnknownTarget { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_passes_through() {
        let err = RouterError::from(ConfigError::unknown_level("verbose"));
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn test_unknown_target() {
        let err = RouterError::unknown_target("logs/app.log");
        assert!(err.to_string().contains("logs/app.log"));
    }
}
