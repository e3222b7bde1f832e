//! Rotated file-name rendering
//!
//! Pure function of (base path, level, granularity, instant). The rendered
//! string keys sink registration, so it must be stable for every call inside
//! one time bucket and change exactly when the bucket boundary is crossed.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::granularity::Granularity;
use crate::level::Level;

/// Render the rotated file name for a base path, level, and granularity
///
/// The level tag and time bucket are inserted before the extension:
/// `logs/app.log` with day granularity and the info level renders as
/// `logs/app_2025-08-23_info.log`. A base path without an extension gets
/// the suffix appended directly.
pub fn rotated_file_name(
    base_path: &Path,
    level: Level,
    granularity: Granularity,
    at: DateTime<Local>,
) -> PathBuf {
    let bucket = granularity.bucket(at);
    let stem = base_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match base_path.extension() {
        Some(ext) => format!("{}_{}_{}.{}", stem, bucket, level.as_str(), ext.to_string_lossy()),
        None => format!("{}_{}_{}", stem, bucket, level.as_str()),
    };
    match base_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(name),
        _ => PathBuf::from(name),
    }
}
