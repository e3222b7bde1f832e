//! Fanlog - Router
//!
//! The log fan-out core. A `LogRouter` takes raw records from a host
//! logging framework, corrects their caller attribution, binds client and
//! tenant context, and writes each record to every registered sink whose
//! level filter matches.
//!
//! ```text
//! [LogRecord] -> [frame unwinder] -> [context binder] -> [level filters]
//!                                                            |
//!                                        +-------------------+------+
//!                                        v                          v
//!                                 [file sinks]               [console sink]
//!                                 (markup stripped)          (ANSI rendered)
//! ```
//!
//! Sinks are provisioned lazily per (base path, level): the first record
//! for a staged target renders the rotated file name for each selected
//! level and registers a sink keyed by that name. Registration is
//! idempotent - a second setup call inside the same time bucket is a
//! no-op.
//!
//! # Example
//!
//! ```ignore
//! use fanlog_config::{LevelSelector, SinkSettings};
//! use fanlog_router::{LogRecord, LogRouter};
//!
//! let router = LogRouter::new("src/host_logging.rs");
//! router.add_target(
//!     SinkSettings::for_path("logs/app.log").with_levels(LevelSelector::All),
//! )?;
//! router.emit(LogRecord::new(Level::Info, "listening", "logs/app.log"));
//! ```

/// Record model: levels, tagged argument variants, bound context
pub mod record;

/// Caller frame unwinding for source attribution
pub mod frames;

/// Client and tenant context binding
pub mod context;

/// Per-level, per-origin record filters
pub mod filter;

/// Keyed, idempotent sink registration
pub mod registry;

/// The dispatch core
pub mod dispatch;

/// Tenant collaborator interface
pub mod tenant;

mod error;

pub use context::{bind, Bound, BoundContext};
pub use dispatch::LogRouter;
pub use error::{Result, RouterError};
pub use fanlog_config::Level;
pub use filter::LevelFilter;
pub use frames::{resolve, Attribution, CallFrame};
pub use record::{ArgValue, CallerContext, LogArgs, LogRecord, RouteLevel};
pub use registry::{RegisterOutcome, RegisteredSink, SinkRegistry};
pub use tenant::{SingleTenant, Tenant, TenantProvider};
