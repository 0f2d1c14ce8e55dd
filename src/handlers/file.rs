//! Rotating file backend

use super::rotating_file::{RotatingWriter, RotationPolicy};
use super::writer::{HandlerOptions, WriterHandler};
use crate::core::Result;
use std::path::Path;

/// Writer backend over a [`RotatingWriter`]
pub type FileHandler = WriterHandler<RotatingWriter>;

impl WriterHandler<RotatingWriter> {
    /// Open `path` with `policy` and wrap it in a backend
    ///
    /// # Errors
    ///
    /// Returns error if the log file cannot be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fanout_logger::handlers::{FileHandler, HandlerOptions, RotationPolicy};
    ///
    /// let handler = FileHandler::file(
    ///     "/var/log/app.log",
    ///     RotationPolicy::new().with_max_backups(7),
    ///     HandlerOptions::default(),
    /// )
    /// .unwrap();
    /// ```
    pub fn file<P: AsRef<Path>>(
        path: P,
        policy: RotationPolicy,
        options: HandlerOptions,
    ) -> Result<Self> {
        let writer = RotatingWriter::open(path, policy)?;
        Ok(WriterHandler::new("file", writer, options))
    }
}
