//! Log severity levels

use std::fmt;

use serde::Deserialize;

use crate::error::ConfigError;

/// Log severity level
///
/// The four levels routed by the fan-out engine. Each carries the numeric
/// severity used when a record arrives with a level name the engine does
/// not recognize and has to fall back to numeric routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum Level {
    /// Debug level - diagnostic detail
    Debug,
    /// Info level - normal operation
    Info,
    /// Warning level - recoverable problems
    Warning,
    /// Error level - failures
    Error,
}

impl Level {
    /// All levels, in ascending severity order
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warning, Level::Error];

    /// Lowercase name, used in rotated file names and selectors
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Uppercase name, used in formatted output
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Numeric severity value
    pub const fn severity(&self) -> u16 {
        match self {
            Self::Debug => 10,
            Self::Info => 20,
            Self::Warning => 30,
            Self::Error => 40,
        }
    }

    /// Parse a level name (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownLevel` for any unrecognized name.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::unknown_level(name)),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl TryFrom<String> for Level {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, ConfigError> {
        Self::parse(&value)
    }
}
