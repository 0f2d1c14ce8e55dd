//! # Fanout Logger
//!
//! A structured logging facade that delivers every record to several
//! backends at once.
//!
//! ## Features
//!
//! - **Extended Levels**: TRACE and FATAL alongside DEBUG, INFO, WARN and ERROR
//! - **Fan-out**: Console, rotating file and custom backends behind one logger
//! - **Attribute Rewriting**: Readable level names and configurable timestamps
//! - **Thread Safe**: Shared minimum level, whole-line writes
//!
//! ## Example
//!
//! ```
//! use fanout_logger::{info, Attr, Logger};
//!
//! let logger = Logger::builder().console(true).level("debug").build().unwrap();
//!
//! info!(logger, "listening on port {}", 8080);
//! logger
//!     .with([Attr::new("request_id", "abc-123")])
//!     .with_group("http")
//!     .log_attrs(fanout_logger::Level::INFO, "served", [Attr::new("status", 200)]);
//! ```

pub mod core;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        Attr, AttrRewriter, FanoutHandler, FieldValue, FileConfig, Handler, Level, LevelVar,
        Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, OutputFormat, Record,
        Result, TimestampCapture, TimestampFormat,
    };
    pub use crate::handlers::{ConsoleHandler, FileHandler, RotationPolicy};
}

pub use crate::core::global;
pub use crate::core::{
    Attr, AttrRewriter, FanoutHandler, FieldValue, FileConfig, Handler, Level, LevelVar, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, OutputFormat, Record, Result,
    ScopedAttr, TimestampCapture, TimestampFormat, LEVEL_KEY, MESSAGE_KEY, TIME_KEY,
};
pub use handlers::{ConsoleHandler, FileHandler, RotationPolicy};
