//! Sink error types

use std::io;

use thiserror::Error;

/// Result type for sink operations
pub type Result<T> = std::result::Result<T, SinkError>;

/// Errors that can occur while writing to a sink
///
/// None of these propagate past the dispatch core: a failed log write must
/// never crash the emitting application.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Underlying file I/O failed
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// Path involved in the failed operation
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Queued mode: the write queue is full, line dropped
    #[error("write queue full, line dropped")]
    QueueFull,

    /// Queued mode: the writer thread has shut down
    #[error("sink writer has shut down")]
    Closed,
}

impl SinkError {
    /// Create an Io error
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
