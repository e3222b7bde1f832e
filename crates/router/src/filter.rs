//! Per-sink record filters
//!
//! Each registered sink accepts exactly one (level, origin) pair. A
//! record matches when its routing level equals the sink's level - by
//! name when the name is known, by numeric severity otherwise - and its
//! origin tag equals the sink's base path.

use std::path::{Path, PathBuf};

use fanlog_config::Level;

use crate::record::{LogRecord, RouteLevel};

/// Filter admitting records of one level from one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelFilter {
    level: Level,
    origin: PathBuf,
}

impl LevelFilter {
    /// Filter for the given level and target base path
    pub fn new(level: Level, origin: impl Into<PathBuf>) -> Self {
        Self {
            level,
            origin: origin.into(),
        }
    }

    /// The level this filter admits
    pub fn level(&self) -> Level {
        self.level
    }

    /// The target base path this filter admits
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Whether the record passes this filter
    pub fn matches(&self, record: &LogRecord) -> bool {
        if record.origin != self.origin {
            return false;
        }
        match record.route_level() {
            RouteLevel::Named(level) => level == self.level,
            RouteLevel::Raw(value) => value == self.level.severity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_same_level_and_origin() {
        let filter = LevelFilter::new(Level::Error, "logs/app.log");
        let record = LogRecord::new(Level::Error, "boom", "logs/app.log");
        assert!(filter.matches(&record));
    }

    #[test]
    fn test_rejects_other_level() {
        let filter = LevelFilter::new(Level::Error, "logs/app.log");
        let record = LogRecord::new(Level::Info, "fine", "logs/app.log");
        assert!(!filter.matches(&record));
    }

    #[test]
    fn test_rejects_other_origin() {
        let filter = LevelFilter::new(Level::Info, "logs/app.log");
        let record = LogRecord::new(Level::Info, "fine", "logs/worker.log");
        assert!(!filter.matches(&record));
    }

    #[test]
    fn test_unknown_level_name_matches_by_severity() {
        let filter = LevelFilter::new(Level::Info, "logs/app.log");
        let record = LogRecord::from_host("CUSTOM", 20, "fine", "logs/app.log");
        assert!(filter.matches(&record));
    }

    #[test]
    fn test_unknown_level_name_with_offbeat_severity_matches_nothing() {
        let record = LogRecord::from_host("NOTICE", 25, "fine", "logs/app.log");
        for level in Level::ALL {
            assert!(!LevelFilter::new(level, "logs/app.log").matches(&record));
        }
    }
}
