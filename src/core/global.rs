//! Process-wide default logger
//!
//! Optional: nothing in this crate logs through the global, it only exists
//! for applications that want one logger reachable from anywhere.

use super::{
    error::{LoggerError, Result},
    logger::Logger,
};
use std::sync::OnceLock;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Install `logger` as the process-wide default
///
/// # Errors
///
/// Returns [`LoggerError::AlreadyInitialized`] if a default is already set;
/// the existing logger stays in place.
pub fn init(logger: Logger) -> Result<()> {
    GLOBAL
        .set(logger)
        .map_err(|_| LoggerError::AlreadyInitialized)
}

/// The process-wide default, if one was installed
pub fn get() -> Option<&'static Logger> {
    GLOBAL.get()
}
