//! Per-target sink settings
//!
//! One `SinkSettings` describes everything a target base path needs: which
//! levels it fans out to, how its files rotate, how long rotated files are
//! kept, and how lines are formatted. Created once at configuration time and
//! never mutated.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Result;
use crate::granularity::Granularity;
use crate::selector::LevelSelector;

/// Default line format: loguru-style markup, centered client column,
/// left-padded level column
pub const DEFAULT_FORMAT: &str = "<green>{time}</green> | <green>{client_addr:^18}</green> | <level>{level: <8}</level>| <cyan>{message}</cyan>";

/// Default size threshold before forced rotation (100 MB)
pub const DEFAULT_MAX_BYTES: u64 = 100 * 1024 * 1024;

/// Default number of rotated files kept per (base path, level)
pub const DEFAULT_RETENTION: usize = 5;

/// Settings for one sink target
///
/// # Example
///
/// ```toml
/// path = "logs/server.log"
/// when = "d"
/// levels = "all"
/// backup_count = 7
/// compression = true
/// enqueue = true
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SinkSettings {
    /// Base file path; the level tag and time bucket are inserted before
    /// its extension
    pub path: PathBuf,

    /// Rotation granularity (s/m/h/d/w)
    pub when: Granularity,

    /// Number of historical rotated files kept per level
    pub backup_count: usize,

    /// Size threshold before forced rotation
    pub max_bytes: u64,

    /// File encoding name; only UTF-8 output is produced
    pub encoding: String,

    /// Requested level selector ("all", one level, or an explicit list)
    /// Default: info only
    pub levels: LevelSelector,

    /// Line format template; None uses [`DEFAULT_FORMAT`]
    pub format: Option<String>,

    /// Compress rotated files
    pub compression: bool,

    /// Defer file creation until the first write
    pub delay: bool,

    /// Queued write-behind: move file I/O off the emitting thread
    pub enqueue: bool,
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("logs/app.log"),
            when: Granularity::Day,
            backup_count: DEFAULT_RETENTION,
            max_bytes: DEFAULT_MAX_BYTES,
            encoding: "utf-8".to_string(),
            levels: LevelSelector::default(),
            format: None,
            compression: true,
            delay: false,
            enqueue: true,
        }
    }
}

impl SinkSettings {
    /// Settings for a base path, everything else defaulted
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the level selector
    #[must_use]
    pub fn with_levels(mut self, levels: LevelSelector) -> Self {
        self.levels = levels;
        self
    }

    /// Set the rotation granularity
    #[must_use]
    pub fn with_granularity(mut self, when: Granularity) -> Self {
        self.when = when;
        self
    }

    /// Set queued write-behind on or off
    #[must_use]
    pub fn with_enqueue(mut self, enqueue: bool) -> Self {
        self.enqueue = enqueue;
        self
    }

    /// Set compression of rotated files on or off
    #[must_use]
    pub fn with_compression(mut self, compression: bool) -> Self {
        self.compression = compression;
        self
    }

    /// The format template in effect
    pub fn format_template(&self) -> &str {
        self.format.as_deref().unwrap_or(DEFAULT_FORMAT)
    }

    /// Retention policy description, e.g. "5 days"
    pub fn retention_description(&self) -> String {
        format!("{} {}s", self.backup_count, self.when.unit_name())
    }

    /// Parse settings from a TOML string
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` on malformed TOML and the level /
    /// granularity errors on bad tokens.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    #[test]
    fn test_defaults() {
        let settings = SinkSettings::default();
        assert_eq!(settings.when, Granularity::Day);
        assert_eq!(settings.backup_count, DEFAULT_RETENTION);
        assert_eq!(settings.max_bytes, DEFAULT_MAX_BYTES);
        assert_eq!(settings.levels.levels(), vec![Level::Info]);
        assert!(settings.compression);
        assert!(settings.enqueue);
        assert!(!settings.delay);
        assert_eq!(settings.format_template(), DEFAULT_FORMAT);
    }

    #[test]
    fn test_from_toml_empty() {
        let settings = SinkSettings::from_toml_str("").unwrap();
        assert_eq!(settings.levels.levels(), vec![Level::Info]);
    }

    #[test]
    fn test_from_toml_full() {
        let settings = SinkSettings::from_toml_str(
            r#"
path = "logs/server.log"
when = "h"
levels = "all"
backup_count = 7
max_bytes = 1048576
compression = false
delay = true
enqueue = false
"#,
        )
        .unwrap();
        assert_eq!(settings.path, PathBuf::from("logs/server.log"));
        assert_eq!(settings.when, Granularity::Hour);
        assert_eq!(settings.levels.levels().len(), 4);
        assert_eq!(settings.backup_count, 7);
        assert_eq!(settings.max_bytes, 1048576);
        assert!(!settings.compression);
        assert!(settings.delay);
        assert!(!settings.enqueue);
    }

    #[test]
    fn test_from_toml_bad_granularity() {
        let err = SinkSettings::from_toml_str("when = \"fortnight\"").unwrap_err();
        assert!(err.to_string().contains("fortnight"));
    }

    #[test]
    fn test_from_toml_bad_level() {
        let err = SinkSettings::from_toml_str("levels = [\"info\", \"chatty\"]").unwrap_err();
        assert!(err.to_string().contains("chatty"));
    }

    #[test]
    fn test_retention_description() {
        let settings = SinkSettings::default().with_granularity(Granularity::Hour);
        assert_eq!(settings.retention_description(), "5 hours");
    }

    #[test]
    fn test_builders() {
        let settings = SinkSettings::for_path("x.log")
            .with_levels(LevelSelector::All)
            .with_enqueue(false)
            .with_compression(false);
        assert_eq!(settings.path, PathBuf::from("x.log"));
        assert_eq!(settings.levels, LevelSelector::All);
        assert!(!settings.enqueue);
        assert!(!settings.compression);
    }
}
