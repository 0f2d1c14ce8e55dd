//! Size-based rotating file writer
//!
//! [`RotatingWriter`] is a plain `io::Write`: it knows nothing about records
//! or levels. Before a write that would push the active file past the
//! configured size it shifts `app.log` to `app.log.1` (older backups move up
//! by one), drops backups beyond the retention count or age, and optionally
//! gzips the fresh backup.

use crate::core::{LoggerError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const MAX_DELETION_FAILURES: usize = 5;

/// Configuration for [`RotatingWriter`]
///
/// # Examples
///
/// ```
/// use fanout_logger::handlers::RotationPolicy;
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new()
///     .with_max_size_mb(50)
///     .with_max_backups(7)
///     .with_max_age(Duration::from_secs(14 * 24 * 3600))
///     .with_compression(true);
/// assert_eq!(policy.max_size, 50 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Size in bytes at which the active file is rotated
    pub max_size: u64,
    /// Maximum number of rotated files to keep
    pub max_backups: usize,
    /// Rotated files older than this are deleted
    pub max_age: Option<Duration>,
    /// Whether to gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size: 100 * 1024 * 1024,
            max_backups: 5,
            max_age: None,
            compress: false,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_mb(mut self, megabytes: u64) -> Self {
        self.max_size = megabytes.saturating_mul(1024 * 1024);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// `io::Write` over a log file that rotates by size
///
/// # Examples
///
/// ```no_run
/// use fanout_logger::handlers::{RotatingWriter, RotationPolicy};
/// use std::io::Write;
///
/// let policy = RotationPolicy::new().with_max_size_mb(10).with_compression(true);
/// let mut writer = RotatingWriter::open("/var/log/app.log", policy).unwrap();
/// writer.write_all(b"level=INFO msg=started\n").unwrap();
/// ```
#[derive(Debug)]
pub struct RotatingWriter {
    base_path: PathBuf,
    policy: RotationPolicy,
    file: Option<File>,
    current_size: u64,
    /// Counter for consecutive deletion failures (reset on successful deletion)
    deletion_failure_count: usize,
}

impl RotatingWriter {
    /// Open (or create) the active log file
    ///
    /// # Errors
    ///
    /// Returns error if the policy is unusable or the file cannot be opened
    pub fn open<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        if policy.max_size == 0 {
            return Err(LoggerError::config(
                "RotationPolicy",
                "max_size must be greater than zero",
            ));
        }

        let base_path = path.as_ref().to_path_buf();

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = Self::open_active(&base_path)?;

        Ok(Self {
            base_path,
            policy,
            file: Some(file),
            current_size,
            deletion_failure_count: 0,
        })
    }

    fn open_active(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_writer(path.display().to_string(), format!("Failed to open: {}", e))
            })?;

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_writer(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok((file, size))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Path of the `index`-th backup (`app.log.1`, `app.log.2`, ...)
    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.base_path.as_os_str().to_owned();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    /// Rotate the active file now
    ///
    /// # Errors
    ///
    /// Returns error if backups cannot be shifted or the new file cannot be created
    pub fn rotate(&mut self) -> Result<()> {
        // Close the active file before renaming it
        self.file.take();

        self.remove_oldest_backup()?;

        if self.policy.max_backups == 0 {
            if self.base_path.exists() {
                fs::remove_file(&self.base_path).map_err(|e| {
                    LoggerError::file_rotation(
                        self.base_path.display().to_string(),
                        format!("Failed to discard current log file: {}", e),
                    )
                })?;
            }
        } else {
            self.shift_backups()?;

            let first = self.backup_path(1);
            if self.base_path.exists() {
                fs::rename(&self.base_path, &first).map_err(|e| {
                    LoggerError::file_rotation(
                        self.base_path.display().to_string(),
                        format!("Failed to rotate current log file: {}", e),
                    )
                })?;

                if self.policy.compress {
                    compress_file(&first)?;
                }
            }
        }

        self.prune_expired_backups();

        let (file, size) = Self::open_active(&self.base_path).map_err(|e| {
            LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!("Failed to create new log file: {}", e),
            )
        })?;
        self.file = Some(file);
        self.current_size = size;

        Ok(())
    }

    /// Delete the backup that would fall beyond `max_backups` after shifting
    fn remove_oldest_backup(&mut self) -> Result<()> {
        let oldest = self.backup_path(self.policy.max_backups.max(1));
        let mut deletion_failed = false;

        for candidate in [gz_path(&oldest), oldest] {
            if candidate.exists() {
                if let Err(e) = fs::remove_file(&candidate) {
                    deletion_failed = true;
                    eprintln!(
                        "[WARN] Failed to remove oldest backup {}: {} (failure #{}/{})",
                        candidate.display(),
                        e,
                        self.deletion_failure_count + 1,
                        MAX_DELETION_FAILURES
                    );
                }
            }
        }

        if deletion_failed {
            self.deletion_failure_count += 1;
            if self.deletion_failure_count >= MAX_DELETION_FAILURES {
                return Err(LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!(
                        "Rotation aborted: failed to delete old backup files {} consecutive times",
                        self.deletion_failure_count
                    ),
                ));
            }
        } else {
            self.deletion_failure_count = 0;
        }

        Ok(())
    }

    /// Move `app.log.N` to `app.log.N+1` for every backup below the limit
    fn shift_backups(&self) -> Result<()> {
        for i in (1..self.policy.max_backups).rev() {
            let old_path = self.backup_path(i);
            let new_path = self.backup_path(i + 1);

            for (from, to) in [
                (gz_path(&old_path), gz_path(&new_path)),
                (old_path, new_path),
            ] {
                if !from.exists() {
                    continue;
                }
                if fs::rename(&from, &to).is_err() {
                    // Some platforms refuse to rename onto an existing file
                    let _ = fs::remove_file(&to);
                    fs::rename(&from, &to).map_err(|e| {
                        LoggerError::file_rotation(
                            from.display().to_string(),
                            format!("Failed to rotate backup files: {}", e),
                        )
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Delete backups older than `max_age`
    fn prune_expired_backups(&self) {
        let Some(max_age) = self.policy.max_age else {
            return;
        };
        let now = SystemTime::now();

        for i in 1..=self.policy.max_backups {
            let plain = self.backup_path(i);
            for candidate in [gz_path(&plain), plain] {
                let Ok(modified) = fs::metadata(&candidate).and_then(|m| m.modified()) else {
                    continue;
                };
                let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
                if age >= max_age {
                    if let Err(e) = fs::remove_file(&candidate) {
                        eprintln!(
                            "[WARN] Failed to remove expired backup {}: {}",
                            candidate.display(),
                            e
                        );
                    }
                }
            }
        }
    }

    fn reopen_after_failure(&mut self) -> io::Result<()> {
        let (file, size) = Self::open_active(&self.base_path).map_err(io::Error::other)?;
        self.file = Some(file);
        self.current_size = size;
        Ok(())
    }
}

impl Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let incoming = buf.len() as u64;

        if self.current_size > 0 && self.current_size + incoming > self.policy.max_size {
            if let Err(e) = self.rotate() {
                eprintln!("[WARN] Log rotation failed: {}. Continuing with current file.", e);

                if self.file.is_none() {
                    if let Err(reopen_err) = self.reopen_after_failure() {
                        eprintln!(
                            "[ERROR] Failed to reopen log file after rotation failure: {}",
                            reopen_err
                        );
                        return Err(io::Error::other(e));
                    }
                }

                // Let the file grow past the limit rather than retry on every write
                self.current_size = 0;
            }
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file is not open"))?;
        file.write_all(buf)?;
        self.current_size += incoming;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file {
            Some(ref mut file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// `app.log.1` -> `app.log.1.gz`
fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

/// Gzip `path` next to itself and remove the original
///
/// The original is only deleted after the compressed file is complete.
fn compress_file(path: &Path) -> Result<()> {
    let gz = gz_path(path);
    let mut tmp_name = gz.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let temp_gz = PathBuf::from(tmp_name);

    let result = (|| -> io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&temp_gz)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
        io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::rename(&temp_gz, &gz)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_gz);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[WARN] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::tempdir;

    fn write_lines(writer: &mut RotatingWriter, count: usize) {
        for i in 0..count {
            writer
                .write_all(format!("level=INFO msg=\"entry {:03}\"\n", i).as_bytes())
                .unwrap();
        }
    }

    #[test]
    fn test_policy_builder() {
        let policy = RotationPolicy::new()
            .with_max_size(1024)
            .with_max_backups(3)
            .with_compression(true);

        assert_eq!(policy.max_size, 1024);
        assert_eq!(policy.max_backups, 3);
        assert!(policy.compress);
        assert_eq!(policy.max_age, None);
    }

    #[test]
    fn test_default_policy() {
        let policy = RotationPolicy::default();
        assert_eq!(policy.max_size, 100 * 1024 * 1024);
        assert_eq!(policy.max_backups, 5);
        assert!(!policy.compress);
    }

    #[test]
    fn test_zero_max_size_is_rejected() {
        let dir = tempdir().unwrap();
        let err = RotatingWriter::open(dir.path().join("a.log"), RotationPolicy::new().with_max_size(0))
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested/deeper/app.log");

        let writer = RotatingWriter::open(&log_path, RotationPolicy::default()).unwrap();
        assert!(log_path.exists());
        assert_eq!(writer.path(), log_path);
        assert_eq!(writer.current_size(), 0);
    }

    #[test]
    fn test_open_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.log");
        fs::write(&log_path, b"previous run\n").unwrap();

        let writer = RotatingWriter::open(&log_path, RotationPolicy::default()).unwrap();
        assert_eq!(writer.current_size(), 13);
    }

    #[test]
    fn test_rotation_by_size() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("rotation.log");
        let policy = RotationPolicy::new().with_max_size(100).with_max_backups(3);

        let mut writer = RotatingWriter::open(&log_path, policy).unwrap();
        write_lines(&mut writer, 20);

        assert!(dir.path().join("rotation.log.1").exists());
        assert!(writer.current_size() <= 100);
        // Lines are never split across files
        let active = fs::read_to_string(&log_path).unwrap();
        assert!(active.ends_with("\"entry 019\"\n"));
    }

    #[test]
    fn test_backup_limit() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("multi.log");
        let policy = RotationPolicy::new().with_max_size(50).with_max_backups(2);

        let mut writer = RotatingWriter::open(&log_path, policy).unwrap();
        write_lines(&mut writer, 100);

        let log_files = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("multi.log"))
            .count();
        assert_eq!(log_files, 3); // current + 2 backups
        assert!(!dir.path().join("multi.log.3").exists());
    }

    #[test]
    fn test_compressed_backups() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("gz.log");
        let policy = RotationPolicy::new()
            .with_max_size(64)
            .with_max_backups(2)
            .with_compression(true);

        let mut writer = RotatingWriter::open(&log_path, policy).unwrap();
        write_lines(&mut writer, 3);

        let gz = dir.path().join("gz.log.1.gz");
        assert!(gz.exists());
        assert!(!dir.path().join("gz.log.1").exists());

        let mut decoded = String::new();
        GzDecoder::new(File::open(gz).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert!(decoded.contains("entry 000"));
    }

    #[test]
    fn test_max_age_prunes_backups() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("aged.log");
        let policy = RotationPolicy::new()
            .with_max_size(40)
            .with_max_backups(3)
            .with_max_age(Duration::ZERO);

        let mut writer = RotatingWriter::open(&log_path, policy).unwrap();
        write_lines(&mut writer, 10);

        for i in 1..=3 {
            assert!(!dir.path().join(format!("aged.log.{}", i)).exists());
        }
        assert!(log_path.exists());
    }

    #[test]
    fn test_zero_backups_discards_rotated_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("none.log");
        let policy = RotationPolicy::new().with_max_size(40).with_max_backups(0);

        let mut writer = RotatingWriter::open(&log_path, policy).unwrap();
        write_lines(&mut writer, 5);

        assert!(!dir.path().join("none.log.1").exists());
        let active = fs::read_to_string(&log_path).unwrap();
        assert_eq!(active.lines().count(), 1);
    }

    #[test]
    fn test_oversized_first_write_goes_to_empty_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("big.log");
        let mut writer =
            RotatingWriter::open(&log_path, RotationPolicy::new().with_max_size(10)).unwrap();

        writer.write_all(b"this line is longer than ten bytes\n").unwrap();

        assert!(!dir.path().join("big.log.1").exists());
        assert_eq!(writer.current_size(), 35);
    }
}
