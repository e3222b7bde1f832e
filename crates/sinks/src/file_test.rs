use super::*;
use chrono::TimeZone;
use fanlog_config::{Granularity, Level};
use tempfile::TempDir;

fn config(dir: &TempDir) -> FileSinkConfig {
    FileSinkConfig {
        base_path: dir.path().join("app.log"),
        level: Level::Info,
        granularity: Granularity::Day,
        max_bytes: 100 * 1024 * 1024,
        retention: 5,
        compression: false,
        delay: false,
        enqueue: false,
        queue_size: DEFAULT_QUEUE_SIZE,
    }
}

fn at(y: i32, mo: u32, d: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, mo, d, 12, 0, 0).unwrap()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

// =============================================================================
// Direct mode
// =============================================================================

#[test]
fn test_open_creates_current_bucket_file() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let expected = config.file_name_at(Local::now());

    let _sink = FileSink::open(config).unwrap();
    assert!(expected.exists());
}

#[test]
fn test_delay_defers_creation_to_first_write() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir);
    config.delay = true;
    let expected = config.file_name_at(Local::now());

    let sink = FileSink::open(config).unwrap();
    assert!(!expected.exists());

    sink.write_line("first").unwrap();
    sink.flush().unwrap();
    assert!(expected.exists());
    assert_eq!(read(&expected), "first\n");
}

#[test]
fn test_write_appends_lines_in_order() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let path = config.file_name_at(Local::now());

    let sink = FileSink::open(config).unwrap();
    sink.write_line("one").unwrap();
    sink.write_line("two").unwrap();
    sink.flush().unwrap();

    assert_eq!(read(&path), "one\ntwo\n");
}

#[test]
fn test_bucket_rotation_switches_files() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir);
    cfg.delay = true;
    let day_one = cfg.file_name_at(at(2025, 8, 22));
    let day_two = cfg.file_name_at(at(2025, 8, 23));

    let mut writer = RollingWriter::new(cfg).unwrap();
    writer.write_line_at("yesterday", at(2025, 8, 22)).unwrap();
    writer.write_line_at("today", at(2025, 8, 23)).unwrap();
    writer.flush().unwrap();

    assert_eq!(read(&day_one), "yesterday\n");
    assert_eq!(read(&day_two), "today\n");
}

#[test]
fn test_bucket_rotation_compresses_closed_file() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir);
    cfg.delay = true;
    cfg.compression = true;
    let day_one = cfg.file_name_at(at(2025, 8, 22));

    let mut writer = RollingWriter::new(cfg).unwrap();
    writer.write_line_at("yesterday", at(2025, 8, 22)).unwrap();
    writer.write_line_at("today", at(2025, 8, 23)).unwrap();
    writer.flush().unwrap();

    assert!(!day_one.exists());
    let mut compressed = day_one.into_os_string();
    compressed.push(".lz4");
    assert!(PathBuf::from(compressed).exists());
}

#[test]
fn test_size_rotation_sets_old_file_aside() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir);
    cfg.max_bytes = 10;
    let path = cfg.file_name_at(Local::now());

    let sink = FileSink::open(cfg).unwrap();
    sink.write_line("aaaaaaaa").unwrap(); // 9 bytes with newline
    sink.write_line("bbbbbbbb").unwrap(); // would exceed 10, rotates
    sink.flush().unwrap();

    let mut aside = path.clone().into_os_string();
    aside.push(".1");
    let aside = PathBuf::from(aside);
    assert_eq!(read(&aside), "aaaaaaaa\n");
    assert_eq!(read(&path), "bbbbbbbb\n");
}

#[test]
fn test_size_rotation_indexes_do_not_collide() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir);
    cfg.max_bytes = 10;
    let path = cfg.file_name_at(Local::now());

    let sink = FileSink::open(cfg).unwrap();
    sink.write_line("aaaaaaaa").unwrap();
    sink.write_line("bbbbbbbb").unwrap();
    sink.write_line("cccccccc").unwrap();
    sink.flush().unwrap();

    for suffix in [".1", ".2"] {
        let mut aside = path.clone().into_os_string();
        aside.push(suffix);
        assert!(PathBuf::from(aside).exists(), "missing {}", suffix);
    }
}

#[test]
fn test_size_rotation_with_compression() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir);
    cfg.max_bytes = 10;
    cfg.compression = true;
    let path = cfg.file_name_at(Local::now());

    let sink = FileSink::open(cfg).unwrap();
    sink.write_line("aaaaaaaa").unwrap();
    sink.write_line("bbbbbbbb").unwrap();
    sink.flush().unwrap();

    let mut compressed = path.into_os_string();
    compressed.push(".1.lz4");
    assert!(PathBuf::from(compressed).exists());
}

#[test]
fn test_retention_prunes_oldest_archives() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir);
    cfg.max_bytes = 10;
    cfg.retention = 1;

    let sink = FileSink::open(cfg).unwrap();
    for line in ["aaaaaaaa", "bbbbbbbb", "cccccccc", "dddddddd"] {
        sink.write_line(line).unwrap();
    }
    sink.flush().unwrap();

    let archived: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .flatten()
        .filter(|e| {
            let name = e.file_name();
            !name.to_string_lossy().ends_with(".log")
        })
        .collect();
    assert_eq!(archived.len(), 1, "retention should keep a single archive");
}

#[test]
fn test_other_level_files_untouched_by_retention() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir);
    cfg.max_bytes = 10;
    cfg.retention = 0;

    // A sibling file for another level must survive pruning.
    let error_file = dir.path().join("app_2025-08-22_error.log");
    fs::write(&error_file, "keep me\n").unwrap();

    let sink = FileSink::open(cfg).unwrap();
    sink.write_line("aaaaaaaa").unwrap();
    sink.write_line("bbbbbbbb").unwrap();
    sink.flush().unwrap();

    assert!(error_file.exists());
}

#[test]
fn test_sibling_target_archives_untouched_by_retention() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir);
    cfg.max_bytes = 10;
    cfg.retention = 0;

    // Archives of a sibling target sharing the stem prefix must survive.
    let sibling = dir.path().join("app_extra_2025-08-22_info.log");
    fs::write(&sibling, "keep me\n").unwrap();

    let sink = FileSink::open(cfg).unwrap();
    sink.write_line("aaaaaaaa").unwrap();
    sink.write_line("bbbbbbbb").unwrap();
    sink.flush().unwrap();

    assert!(sibling.exists());
}

#[test]
fn test_rotated_name_matcher_shapes() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir);
    cfg.delay = true;
    let writer = RollingWriter::new(cfg).unwrap();

    assert!(writer.is_own_rotated_file("app_2025-08-22_info.log"));
    assert!(writer.is_own_rotated_file("app_2025-08-22_info.log.1"));
    assert!(writer.is_own_rotated_file("app_2025-08-22_info.log.1.lz4"));
    assert!(!writer.is_own_rotated_file("app_2025-08-22_error.log"));
    assert!(!writer.is_own_rotated_file("app_extra_2025-08-22_info.log"));
    assert!(!writer.is_own_rotated_file("apple_2025-08-22_info.log"));
    assert!(!writer.is_own_rotated_file("other_2025-08-22_info.log"));
    assert!(!writer.is_own_rotated_file("app_info.log"));
}

// =============================================================================
// Queued mode
// =============================================================================

#[test]
fn test_queued_writes_preserve_order() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir);
    cfg.enqueue = true;
    let path = cfg.file_name_at(Local::now());

    let sink = FileSink::open(cfg).unwrap();
    for i in 0..100 {
        sink.write_line(&format!("line {}", i)).unwrap();
    }
    sink.flush().unwrap();

    let text = read(&path);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 100);
    assert_eq!(lines[0], "line 0");
    assert_eq!(lines[99], "line 99");
}

#[test]
fn test_queued_drop_drains_pending_lines() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir);
    cfg.enqueue = true;
    let path = cfg.file_name_at(Local::now());

    {
        let sink = FileSink::open(cfg).unwrap();
        sink.write_line("pending").unwrap();
        // Dropped without an explicit flush; drop joins the writer thread.
    }

    assert_eq!(read(&path), "pending\n");
}

#[test]
fn test_queued_concurrent_emitters_keep_whole_lines() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config(&dir);
    cfg.enqueue = true;
    let path = cfg.file_name_at(Local::now());

    let sink = std::sync::Arc::new(FileSink::open(cfg).unwrap());
    let mut handles = Vec::new();
    for t in 0..4 {
        let sink = std::sync::Arc::clone(&sink);
        handles.push(std::thread::spawn(move || {
            for i in 0..50 {
                sink.write_line(&format!("thread{} line{}", t, i)).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    sink.flush().unwrap();

    let text = read(&path);
    assert_eq!(text.lines().count(), 200);
    for line in text.lines() {
        assert!(line.starts_with("thread"), "interleaved line: {:?}", line);
    }
}
