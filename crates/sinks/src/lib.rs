//! Fanlog - Sinks
//!
//! Output destinations for the log fan-out engine. A sink owns its own
//! rotation, retention, and compression policy; the router only appends
//! formatted lines.
//!
//! # Available sinks
//!
//! | Sink | Purpose | Rotation |
//! |------|---------|----------|
//! | `file` | Per-(base path, level) rotated log files | Yes |
//! | `console` | Colorized stderr output | No |
//!
//! The file sink writes either directly on the emitting thread or, in
//! queued mode, hands whole lines to a dedicated writer thread over a
//! bounded channel so the emitter never blocks on disk I/O.

/// Rotated, size-bounded file output
pub mod file;

/// Colorized stderr output
pub mod console;

/// Line format templates with padding specs
pub mod format;

/// Markup tag stripping and ANSI rendering
pub mod markup;

/// Compression of rotated files
mod archive;

/// Throttled reporting of hot-path failures
mod throttle;

mod error;

pub use archive::compress_rotated;
pub use console::ConsoleSink;
pub use error::{Result, SinkError};
pub use file::{FileSink, FileSinkConfig};
pub use format::{LineTemplate, LineValues, TemplateError};
pub use throttle::ErrorThrottle;
