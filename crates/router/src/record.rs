//! Log record model
//!
//! A record is immutable once created; it flows read-only through the
//! pipeline and only the bound context and the trimmed message are
//! attached on the way out. Argument shapes are a tagged variant rather
//! than anything duck-typed: a record carries keyed fields, a positional
//! list, or nothing.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use fanlog_config::Level;

use crate::frames::CallFrame;

/// Structured or positional record arguments
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogArgs {
    /// No arguments
    #[default]
    Empty,
    /// Mapping-style arguments (`client_addr`, `client`, ...)
    KeyedFields(BTreeMap<String, String>),
    /// Ordered positional arguments
    Positional(Vec<ArgValue>),
}

impl LogArgs {
    /// Keyed fields from an iterator of pairs
    pub fn keyed<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::KeyedFields(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One positional argument value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// Plain text
    Text(String),
    /// A two-element pair, joined with a colon when treated as an address
    Pair(String, String),
}

/// Explicit caller-supplied context
///
/// Replaces the old practice of recovering a caller-local `details` map by
/// stack inspection: callers that want a client attached without passing
/// it in the arguments thread it here instead.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallerContext {
    /// Client address or session identifier
    pub client: Option<String>,
}

impl CallerContext {
    /// Context carrying a client identifier
    pub fn with_client(client: impl Into<String>) -> Self {
        Self {
            client: Some(client.into()),
        }
    }
}

/// Level a record routes under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteLevel {
    /// The level name resolved to a known level
    Named(Level),
    /// Unknown level name; route by the raw numeric value
    Raw(u16),
}

impl RouteLevel {
    /// Display string for formatted output
    pub fn display(&self) -> String {
        match self {
            Self::Named(level) => level.display_name().to_string(),
            Self::Raw(value) => value.to_string(),
        }
    }

    /// Best-effort level for markup coloring
    pub fn color_level(&self) -> Level {
        match self {
            Self::Named(level) => *level,
            Self::Raw(value) => Level::ALL
                .into_iter()
                .find(|l| l.severity() == *value)
                .unwrap_or(Level::Info),
        }
    }
}

/// One inbound log record
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Record creation time
    pub timestamp: DateTime<Utc>,
    /// Level name as supplied by the host framework
    pub level_name: String,
    /// Numeric level, used when the name is unknown
    pub level_no: u16,
    /// Message text
    pub message: String,
    /// Origin tag: the target base path this record belongs to
    pub origin: PathBuf,
    /// Positional or keyed arguments
    pub args: LogArgs,
    /// Rendered exception info, appended to the output when present
    pub exception: Option<String>,
    /// Current stack frame at the call site, if the host supplies one
    pub frame: Option<CallFrame>,
    /// Explicit caller context
    pub caller_context: Option<CallerContext>,
}

impl LogRecord {
    /// Record at a known level
    pub fn new(level: Level, message: impl Into<String>, origin: impl Into<PathBuf>) -> Self {
        Self {
            timestamp: Utc::now(),
            level_name: level.as_str().to_string(),
            level_no: level.severity(),
            message: message.into(),
            origin: origin.into(),
            args: LogArgs::Empty,
            exception: None,
            frame: None,
            caller_context: None,
        }
    }

    /// Record as handed over by a host logging framework, which may carry
    /// a level name the engine does not know
    pub fn from_host(
        level_name: impl Into<String>,
        level_no: u16,
        message: impl Into<String>,
        origin: impl Into<PathBuf>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            level_name: level_name.into(),
            level_no,
            message: message.into(),
            origin: origin.into(),
            args: LogArgs::Empty,
            exception: None,
            frame: None,
            caller_context: None,
        }
    }

    /// Attach arguments
    #[must_use]
    pub fn with_args(mut self, args: LogArgs) -> Self {
        self.args = args;
        self
    }

    /// Attach exception info
    #[must_use]
    pub fn with_exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    /// Attach the call-site stack frame
    #[must_use]
    pub fn with_frame(mut self, frame: CallFrame) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Attach explicit caller context
    #[must_use]
    pub fn with_caller_context(mut self, context: CallerContext) -> Self {
        self.caller_context = Some(context);
        self
    }

    /// Resolve the routing level: the named level when known, otherwise
    /// the raw numeric value
    pub fn route_level(&self) -> RouteLevel {
        match Level::parse(&self.level_name) {
            Ok(level) => RouteLevel::Named(level),
            Err(_) => RouteLevel::Raw(self.level_no),
        }
    }
}
