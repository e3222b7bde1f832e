//! Rotated file sink
//!
//! One `FileSink` serves one (base path, level) pair. The sink owns its
//! whole lifecycle policy: it re-renders the time-bucketed file name on
//! every write and rotates when the bucket changes, forces a rotation when
//! the file reaches its size threshold, compresses closed files when
//! configured, and prunes archived siblings beyond the retention count.
//!
//! Two write modes:
//!
//! - **direct**: the emitting thread writes through a buffered writer under
//!   a mutex.
//! - **queued**: whole lines go over a bounded channel to a dedicated
//!   writer thread, so the emitter never blocks on disk I/O. `try_send` on
//!   the hot path; a full queue drops the line and surfaces `QueueFull`.
//!
//! Per-sink write order is the enqueue order in both modes. Partial lines
//! never interleave: a line is a single message.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use fanlog_config::{rotated_file_name, Granularity, Level, SinkSettings};

use crate::archive::compress_rotated;
use crate::error::{Result, SinkError};
use crate::throttle::ErrorThrottle;

/// Default queue capacity for queued mode
pub const DEFAULT_QUEUE_SIZE: usize = 10_000;

/// Configuration for one file sink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Base file path; bucket and level tag are inserted before the extension
    pub base_path: PathBuf,

    /// The single level this sink receives
    pub level: Level,

    /// Time bucket granularity
    pub granularity: Granularity,

    /// Size threshold before forced rotation
    pub max_bytes: u64,

    /// Archived files kept per (base path, level)
    pub retention: usize,

    /// Compress rotated files to LZ4
    pub compression: bool,

    /// Defer file creation until the first write
    pub delay: bool,

    /// Queued write-behind mode
    pub enqueue: bool,

    /// Queue capacity in lines (queued mode only)
    pub queue_size: usize,
}

impl FileSinkConfig {
    /// Build a per-level sink config from target settings
    pub fn from_settings(settings: &SinkSettings, level: Level) -> Self {
        Self {
            base_path: settings.path.clone(),
            level,
            granularity: settings.when,
            max_bytes: settings.max_bytes,
            retention: settings.backup_count,
            compression: settings.compression,
            delay: settings.delay,
            enqueue: settings.enqueue,
            queue_size: DEFAULT_QUEUE_SIZE,
        }
    }

    /// The rotated file name this sink writes to at the given instant
    pub fn file_name_at(&self, at: DateTime<Local>) -> PathBuf {
        rotated_file_name(&self.base_path, self.level, self.granularity, at)
    }
}

/// A sink writing to rotated, size-bounded log files
pub struct FileSink {
    mode: Mode,
}

enum Mode {
    Direct(Mutex<RollingWriter>),
    Queued(QueuedHandle),
}

impl FileSink {
    /// Open a file sink
    ///
    /// Unless `delay` is set, the current bucket's file is created
    /// immediately so configuration problems surface at setup time.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Io` if the directory or file cannot be created.
    pub fn open(config: FileSinkConfig) -> Result<Self> {
        let enqueue = config.enqueue;
        let queue_size = config.queue_size;
        let writer = RollingWriter::new(config)?;
        let mode = if enqueue {
            Mode::Queued(QueuedHandle::spawn(writer, queue_size)?)
        } else {
            Mode::Direct(Mutex::new(writer))
        };
        Ok(Self { mode })
    }

    /// Append one line (without trailing newline)
    ///
    /// # Errors
    ///
    /// Direct mode surfaces I/O errors; queued mode surfaces `QueueFull`
    /// when the writer thread is behind and `Closed` after shutdown.
    pub fn write_line(&self, line: &str) -> Result<()> {
        match &self.mode {
            Mode::Direct(writer) => writer.lock().write_line(line),
            Mode::Queued(handle) => handle.send_line(line),
        }
    }

    /// Flush buffered output to disk
    ///
    /// In queued mode this waits for the writer thread to drain everything
    /// enqueued before the call.
    pub fn flush(&self) -> Result<()> {
        match &self.mode {
            Mode::Direct(writer) => writer.lock().flush(),
            Mode::Queued(handle) => handle.flush(),
        }
    }
}

// ============================================================================
// RollingWriter - rotation, retention, compression
// ============================================================================

struct OpenFile {
    path: PathBuf,
    writer: BufWriter<File>,
    bytes: u64,
}

struct RollingWriter {
    config: FileSinkConfig,
    open: Option<OpenFile>,
}

enum Action {
    Keep,
    Open,
    BucketRotate,
    SizeRotate,
}

impl RollingWriter {
    fn new(config: FileSinkConfig) -> Result<Self> {
        let mut writer = Self { config, open: None };
        if !writer.config.delay {
            let target = writer.config.file_name_at(Local::now());
            writer.open_at(target)?;
        }
        Ok(writer)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.write_line_at(line, Local::now())
    }

    fn write_line_at(&mut self, line: &str, at: DateTime<Local>) -> Result<()> {
        let target = self.config.file_name_at(at);
        let line_len = line.len() as u64 + 1;

        let action = match &self.open {
            None => Action::Open,
            Some(f) if f.path != target => Action::BucketRotate,
            Some(f) if f.bytes > 0 && f.bytes + line_len > self.config.max_bytes => {
                Action::SizeRotate
            }
            Some(_) => Action::Keep,
        };

        match action {
            Action::Keep => {}
            Action::Open => self.open_at(target)?,
            Action::BucketRotate => {
                let closed = self.close()?;
                self.archive(&closed, &target);
                self.open_at(target)?;
            }
            Action::SizeRotate => {
                let closed = self.close()?;
                let aside = set_aside(&closed)?;
                self.archive(&aside, &target);
                self.open_at(target)?;
            }
        }

        let Some(file) = self.open.as_mut() else {
            return Err(SinkError::Closed);
        };
        file.writer
            .write_all(line.as_bytes())
            .and_then(|_| file.writer.write_all(b"\n"))
            .map_err(|e| SinkError::io(file.path.display().to_string(), e))?;
        file.bytes += line_len;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(file) = self.open.as_mut() {
            file.writer
                .flush()
                .map_err(|e| SinkError::io(file.path.display().to_string(), e))?;
        }
        Ok(())
    }

    fn open_at(&mut self, path: PathBuf) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(|e| SinkError::io(dir.display().to_string(), e))?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SinkError::io(path.display().to_string(), e))?;
        let bytes = file
            .metadata()
            .map(|m| m.len())
            .map_err(|e| SinkError::io(path.display().to_string(), e))?;
        tracing::debug!(path = %path.display(), bytes, "opened sink file");
        self.open = Some(OpenFile {
            path,
            writer: BufWriter::new(file),
            bytes,
        });
        Ok(())
    }

    /// Close the current file and return its path
    fn close(&mut self) -> Result<PathBuf> {
        match self.open.take() {
            Some(mut file) => {
                file.writer
                    .flush()
                    .map_err(|e| SinkError::io(file.path.display().to_string(), e))?;
                Ok(file.path)
            }
            None => Err(SinkError::Closed),
        }
    }

    /// Compress a closed file if configured, then prune old archives
    ///
    /// Archival is best-effort: a failure here must not lose the record
    /// that triggered the rotation, so errors are logged and swallowed.
    fn archive(&self, closed: &Path, upcoming: &Path) {
        let archived = if self.config.compression {
            match compress_rotated(closed) {
                Ok(dest) => dest,
                Err(e) => {
                    tracing::warn!(path = %closed.display(), error = %e, "compression failed");
                    closed.to_path_buf()
                }
            }
        } else {
            closed.to_path_buf()
        };
        tracing::debug!(path = %archived.display(), "rotated sink file");
        self.prune(upcoming);
    }

    /// Delete the oldest archived siblings beyond the retention count
    fn prune(&self, active: &Path) {
        let dir = match self.config.base_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "retention scan failed");
                return;
            }
        };

        let mut archived: Vec<(std::time::SystemTime, PathBuf)> = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path == active {
                continue;
            }
            let name = entry.file_name();
            if !self.is_own_rotated_file(&name.to_string_lossy()) {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH);
            archived.push((modified, path));
        }

        if archived.len() <= self.config.retention {
            return;
        }
        archived.sort();
        let excess = archived.len() - self.config.retention;
        for (_, path) in archived.into_iter().take(excess) {
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "retention delete failed");
            } else {
                tracing::debug!(path = %path.display(), "retention deleted");
            }
        }
    }

    /// Whether a directory entry is one of this sink's own rotated files
    ///
    /// The full rendered-name shape is required: the base stem, a
    /// time-bucket token of this sink's granularity, then the level tag,
    /// optionally followed by an extension and `.N`/`.lz4` suffixes. A
    /// bare stem-prefix check would also capture archives of a sibling
    /// target like `app_extra.log` next to `app.log`.
    fn is_own_rotated_file(&self, name: &str) -> bool {
        let stem = self
            .config
            .base_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(rest) = name
            .strip_prefix(&stem)
            .and_then(|r| r.strip_prefix('_'))
        else {
            return false;
        };

        // Bucket tokens are fixed-width per granularity.
        let bucket_len = self.config.granularity.bucket(Local::now()).len();
        if rest.len() <= bucket_len {
            return false;
        }
        let (bucket, tail) = rest.split_at(bucket_len);
        if !bucket
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-' || c == '_')
        {
            return false;
        }

        let Some(tail) = tail.strip_prefix('_') else {
            return false;
        };
        match tail.strip_prefix(self.config.level.as_str()) {
            Some(suffix) => suffix.is_empty() || suffix.starts_with('.'),
            None => false,
        }
    }
}

/// Move a size-rotated file aside so the same bucket name can reopen fresh
fn set_aside(path: &Path) -> Result<PathBuf> {
    for index in 1u32.. {
        let mut name = path.as_os_str().to_os_string();
        name.push(format!(".{}", index));
        let candidate = PathBuf::from(name);
        let mut compressed = candidate.as_os_str().to_os_string();
        compressed.push(".lz4");
        if candidate.exists() || Path::new(&compressed).exists() {
            continue;
        }
        fs::rename(path, &candidate)
            .map_err(|e| SinkError::io(path.display().to_string(), e))?;
        return Ok(candidate);
    }
    Err(SinkError::Closed)
}

// ============================================================================
// Queued mode - bounded channel to a dedicated writer thread
// ============================================================================

enum Command {
    Line(String),
    Flush(oneshot::Sender<()>),
}

struct QueuedHandle {
    tx: Option<mpsc::Sender<Command>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl QueuedHandle {
    fn spawn(writer: RollingWriter, queue_size: usize) -> Result<Self> {
        let (tx, rx) = mpsc::channel(queue_size.max(1));
        let worker = std::thread::Builder::new()
            .name("fanlog-sink-writer".to_string())
            .spawn(move || run_writer(writer, rx))
            .map_err(|e| SinkError::io("writer thread", e))?;
        Ok(Self {
            tx: Some(tx),
            worker: Mutex::new(Some(worker)),
        })
    }

    fn send_line(&self, line: &str) -> Result<()> {
        let tx = self.tx.as_ref().ok_or(SinkError::Closed)?;
        tx.try_send(Command::Line(line.to_string()))
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => SinkError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => SinkError::Closed,
            })
    }

    fn flush(&self) -> Result<()> {
        let tx = self.tx.as_ref().ok_or(SinkError::Closed)?;
        let (ack_tx, ack_rx) = oneshot::channel();
        tx.blocking_send(Command::Flush(ack_tx))
            .map_err(|_| SinkError::Closed)?;
        ack_rx.blocking_recv().map_err(|_| SinkError::Closed)
    }
}

impl Drop for QueuedHandle {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit.
        self.tx = None;
        if let Some(worker) = self.worker.lock().take() {
            let _ = worker.join();
        }
    }
}

fn run_writer(mut writer: RollingWriter, mut rx: mpsc::Receiver<Command>) {
    let failures = ErrorThrottle::default();
    while let Some(command) = rx.blocking_recv() {
        match command {
            Command::Line(line) => {
                if let Err(e) = writer.write_line(&line) {
                    failures.report("queued write", &e);
                }
            }
            Command::Flush(ack) => {
                if let Err(e) = writer.flush() {
                    failures.report("queued flush", &e);
                }
                let _ = ack.send(());
            }
        }
    }
    if let Err(e) = writer.flush() {
        failures.report("final flush", &e);
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;
