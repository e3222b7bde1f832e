//! Level selectors
//!
//! A selector names which levels a target fans out to: the literal string
//! `"all"`, a single level name, or an explicit list of level names. When a
//! target does not specify a selector at all, the default is `["info"]` -
//! deliberately not `"all"`.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::level::Level;

/// Requested level selector for a sink target
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSelector")]
pub enum LevelSelector {
    /// Every level
    All,
    /// A single level
    One(Level),
    /// An explicit set of levels
    Set(Vec<Level>),
}

/// Wire shape: either a string or a list of strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSelector {
    Name(String),
    Names(Vec<String>),
}

impl LevelSelector {
    /// Parse a selector from a single name (`"all"` or a level name)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownLevel` for an unrecognized level name.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        if name.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::One(Level::parse(name)?))
        }
    }

    /// Parse a selector from an explicit list of level names
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownLevel` on the first unrecognized name.
    pub fn parse_list(names: &[String]) -> Result<Self, ConfigError> {
        let levels = names
            .iter()
            .map(|n| Level::parse(n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Set(levels))
    }

    /// The concrete levels this selector routes, deduplicated,
    /// in severity order
    pub fn levels(&self) -> Vec<Level> {
        let mut levels = match self {
            Self::All => Level::ALL.to_vec(),
            Self::One(level) => vec![*level],
            Self::Set(levels) => levels.clone(),
        };
        levels.sort();
        levels.dedup();
        levels
    }
}

impl Default for LevelSelector {
    fn default() -> Self {
        Self::One(Level::Info)
    }
}

impl TryFrom<RawSelector> for LevelSelector {
    type Error = ConfigError;

    fn try_from(raw: RawSelector) -> Result<Self, ConfigError> {
        match raw {
            RawSelector::Name(name) => Self::parse(&name),
            RawSelector::Names(names) => Self::parse_list(&names),
        }
    }
}
