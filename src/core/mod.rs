//! Core logger types and traits

pub mod attr;
pub mod config;
pub mod error;
pub mod fanout;
pub mod global;
pub mod handler;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod record;
pub mod rewriter;
pub mod timestamp;

pub use attr::{Attr, FieldValue};
pub use config::{FileConfig, LoggerConfig};
pub use error::{LoggerError, Result};
pub use fanout::FanoutHandler;
pub use handler::Handler;
pub use level::{Level, LevelVar};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use output_format::{OutputFormat, ScopedAttr};
pub use record::{Record, LEVEL_KEY, MESSAGE_KEY, TIME_KEY};
pub use rewriter::{AttrRewriter, TimestampCapture};
pub use timestamp::TimestampFormat;
