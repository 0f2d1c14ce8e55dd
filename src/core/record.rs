//! Log record structure

use super::attr::Attr;
use super::level::Level;
use chrono::{DateTime, Utc};

/// Key of the built-in timestamp field
pub const TIME_KEY: &str = "time";
/// Key of the built-in level field
pub const LEVEL_KEY: &str = "level";
/// Key of the built-in message field
pub const MESSAGE_KEY: &str = "msg";

/// One log call, built once and handed to every backend by reference
#[derive(Debug, Clone)]
pub struct Record {
    pub time: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    attrs: Vec<Attr>,
}

impl Record {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            level,
            message: message.into(),
            attrs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }

    #[must_use]
    pub fn with_attrs<I>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = Attr>,
    {
        self.attrs.extend(attrs);
        self
    }

    pub fn add_attr(&mut self, attr: Attr) {
        self.attrs.push(attr);
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// The built-in fields in rendering order
    pub fn builtin_attrs(&self) -> [Attr; 3] {
        [
            Attr::new(TIME_KEY, self.time),
            Attr::new(LEVEL_KEY, self.level),
            Attr::new(MESSAGE_KEY, self.message.as_str()),
        ]
    }
}
