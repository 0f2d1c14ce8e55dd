//! Handler trait for log output destinations

use super::{attr::Attr, error::Result, level::Level, record::Record};
use std::sync::Arc;

/// Capability set every backend provides
///
/// Handlers are shared across threads and never mutated by a log call;
/// `with_attrs` and `with_group` return new handlers instead.
pub trait Handler: Send + Sync {
    /// Whether a record at `level` would be handled
    fn enabled(&self, level: Level) -> bool;

    /// Render and write one record
    fn handle(&self, record: &Record) -> Result<()>;

    /// A handler that adds `attrs` to every record it renders
    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler>;

    /// A handler that nests every later attribute under `name`
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
