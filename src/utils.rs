use crate::error::BenchError;
use anyhow::Result;
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;
const TB: u64 = GB * 1024;
const PB: u64 = TB * 1024;

/// Formats byte count in human-readable form (e.g., "1.5 GB")
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Parses a byte size such as "10MB", "512kb", "1.5 GB" or "4096".
///
/// Units are binary multiples and case-insensitive; a bare number is bytes.
pub fn parse_size(input: &str) -> Result<u64, BenchError> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    let invalid = || BenchError::Config(format!("invalid file size: {:?}", input));

    let value: f64 = number.parse().map_err(|_| invalid())?;
    let multiplier = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "kb" => KB,
        "mb" => MB,
        "gb" => GB,
        "tb" => TB,
        "pb" => PB,
        _ => return Err(invalid()),
    };

    let bytes = (value * multiplier as f64).floor();
    // `u64::MAX as f64` rounds up to 2^64, which does not fit.
    if !bytes.is_finite() || bytes >= u64::MAX as f64 {
        return Err(invalid());
    }
    Ok(bytes as u64)
}

/// Appends timestamped lines to an audit file.
pub struct Logger {
    file_path: PathBuf,
}

impl Logger {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    pub fn log(&self, message: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "[{}] {}", timestamp, message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_logger() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("bench.log");

        let logger = Logger::new(&log_path);
        logger.log("md5: 12.00 ms")?;
        logger.log("sha256: 30.00 ms")?;

        let content = fs::read_to_string(&log_path)?;
        assert!(content.contains("md5: 12.00 ms"));
        assert!(content.contains("sha256: 30.00 ms"));
        assert!(content.starts_with('['));
        assert_eq!(content.lines().count(), 2);
        Ok(())
    }

    #[test]
    fn test_parse_size() -> Result<()> {
        assert_eq!(parse_size("10MB")?, 10 * 1024 * 1024);
        assert_eq!(parse_size("10mb")?, 10 * 1024 * 1024);
        assert_eq!(parse_size("512 kb")?, 512 * 1024);
        assert_eq!(parse_size("1.5GB")?, 3 * 512 * 1024 * 1024);
        assert_eq!(parse_size("4096")?, 4096);
        assert_eq!(parse_size("0")?, 0);
        assert_eq!(parse_size("7b")?, 7);
        assert_eq!(parse_size("16383PB")?, 16383 * 1024 * 1024 * 1024 * 1024 * 1024);
        Ok(())
    }

    #[test]
    fn test_parse_size_rejects_garbage() {
        for input in ["", "MB", "ten", "10XB", "1.2.3kb", "-5MB", "16384PB"] {
            assert!(
                matches!(parse_size(input), Err(BenchError::Config(_))),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(10 * 1024 * 1024), "10.00 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
    }
}
