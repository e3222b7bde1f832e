//! Fanlog - Configuration
//!
//! Configuration surface for the log fan-out engine: severity levels,
//! rotation granularity tokens, level selectors, per-sink settings, and the
//! rotated file-name pattern shared by the router and the sinks.
//!
//! All settings deserialize from TOML with sensible defaults, so a bare
//! target is a valid configuration:
//!
//! ```toml
//! path = "logs/app.log"
//! when = "d"
//! levels = "all"
//! ```

mod auth;
mod error;
mod granularity;
mod level;
mod naming;
mod selector;
mod sink;

pub use auth::AuthConfig;
pub use error::{ConfigError, Result};
pub use granularity::Granularity;
pub use level::Level;
pub use naming::rotated_file_name;
pub use selector::LevelSelector;
pub use sink::{SinkSettings, DEFAULT_FORMAT, DEFAULT_MAX_BYTES, DEFAULT_RETENTION};
