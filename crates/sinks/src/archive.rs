//! Compression of rotated log files
//!
//! When a sink with compression enabled closes a file, the closed file is
//! compressed in place to LZ4 frame format and the original removed. The
//! active file is never compressed; this only touches files that already
//! rotated out.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use lz4_flex::frame::FrameEncoder;

/// Compress a rotated file to `<name>.lz4`, removing the original
///
/// Returns the path of the compressed file.
pub fn compress_rotated(path: &Path) -> io::Result<PathBuf> {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lz4");
    let dest = PathBuf::from(name);

    let input = File::open(path)?;
    let output = File::create(&dest)?;
    let mut encoder = FrameEncoder::new(BufWriter::new(output));
    io::copy(&mut BufReader::new(input), &mut encoder)?;
    let mut writer = encoder.finish()?;
    writer.flush()?;
    drop(writer);

    fs::remove_file(path)?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lz4_flex::frame::FrameDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_compress_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app_2025-08-23_info.log");
        fs::write(&path, "line one\nline two\n").unwrap();

        let compressed = compress_rotated(&path).unwrap();
        assert_eq!(
            compressed,
            dir.path().join("app_2025-08-23_info.log.lz4")
        );
        assert!(!path.exists());

        let mut decoder = FrameDecoder::new(File::open(&compressed).unwrap());
        let mut text = String::new();
        decoder.read_to_string(&mut text).unwrap();
        assert_eq!(text, "line one\nline two\n");
    }

    #[test]
    fn test_compress_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.log");
        assert!(compress_rotated(&missing).is_err());
    }
}
