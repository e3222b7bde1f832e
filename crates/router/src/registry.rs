//! Keyed sink registration
//!
//! Sinks are keyed by their rendered file name, not by target settings:
//! two setup calls inside the same time bucket render the same name and
//! collapse to one sink, while a call in the next bucket renders a new
//! name and provisions fresh files, retiring the previous bucket's sink
//! for the same (level, origin). The check and the creation happen under
//! one lock so concurrent first-touch callers cannot double-open a file.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use fanlog_sinks::{FileSink, LineTemplate, SinkError};

use crate::filter::LevelFilter;
use crate::record::LogRecord;

/// A provisioned sink with its filter and output template
pub struct RegisteredSink {
    /// Filter deciding which records this sink receives
    pub filter: LevelFilter,
    /// Line template rendered per record
    pub template: Arc<LineTemplate>,
    /// The underlying rotated file sink
    pub sink: FileSink,
}

/// Whether a registration call provisioned anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// A new sink was provisioned under this key
    Created,
    /// The key was already registered; nothing was opened
    AlreadyExists,
}

/// Registry of provisioned sinks, keyed by rendered file name
#[derive(Default)]
pub struct SinkRegistry {
    entries: Mutex<HashMap<PathBuf, Arc<RegisteredSink>>>,
}

impl SinkRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink under `file_name`, provisioning it with `make`
    /// only when the key is new.
    ///
    /// A created sink retires any entry carrying the same filter under a
    /// different key: that entry is the previous time bucket's sink for
    /// the same (level, origin), and keeping both would write every
    /// matching record twice.
    ///
    /// # Errors
    ///
    /// Propagates the provisioning error; the key stays unregistered so
    /// a later call can retry.
    pub fn register(
        &self,
        file_name: PathBuf,
        make: impl FnOnce() -> Result<RegisteredSink, SinkError>,
    ) -> Result<RegisterOutcome, SinkError> {
        let mut entries = self.entries.lock();
        if entries.contains_key(&file_name) {
            return Ok(RegisterOutcome::AlreadyExists);
        }
        let sink = make()?;
        entries.retain(|_, entry| entry.filter != sink.filter);
        entries.insert(file_name, Arc::new(sink));
        Ok(RegisterOutcome::Created)
    }

    /// Every registered sink whose filter admits the record
    pub fn matching(&self, record: &LogRecord) -> Vec<Arc<RegisteredSink>> {
        self.entries
            .lock()
            .values()
            .filter(|entry| entry.filter.matches(record))
            .cloned()
            .collect()
    }

    /// All registered sinks
    pub fn all(&self) -> Vec<Arc<RegisteredSink>> {
        self.entries.lock().values().cloned().collect()
    }

    /// Number of registered sinks
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no sinks are registered
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Whether a sink is registered under `file_name`
    pub fn contains(&self, file_name: &std::path::Path) -> bool {
        self.entries.lock().contains_key(file_name)
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;
