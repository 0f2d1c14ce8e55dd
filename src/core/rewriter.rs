//! Per-field rewriting applied by backends at render time
//!
//! The rewriter turns the raw level rank into one of the six level names and
//! replaces the timestamp with its rendering in the bound [`TimestampFormat`]
//! (an integer for the Unix formats, a string otherwise). It touches only the
//! field it is given, so one instance is shared by every backend of a logger.

use super::attr::{Attr, FieldValue};
use super::record::{LEVEL_KEY, TIME_KEY};
use super::timestamp::TimestampFormat;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Which instant the rendered `time` field shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampCapture {
    /// Wall-clock time when the backend renders the record
    #[default]
    Render,
    /// Time the record was created by the log call
    Record,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrRewriter {
    format: TimestampFormat,
    capture: TimestampCapture,
}

impl AttrRewriter {
    #[must_use]
    pub fn new(format: TimestampFormat) -> Self {
        Self {
            format,
            capture: TimestampCapture::default(),
        }
    }

    #[must_use]
    pub fn with_capture(mut self, capture: TimestampCapture) -> Self {
        self.capture = capture;
        self
    }

    pub fn format(&self) -> &TimestampFormat {
        &self.format
    }

    pub fn capture(&self) -> TimestampCapture {
        self.capture
    }

    /// Rewrite one field found under the group path `groups`
    ///
    /// # Examples
    ///
    /// ```
    /// use fanout_logger::{Attr, AttrRewriter, FieldValue, Level, TimestampFormat};
    ///
    /// let rewriter = AttrRewriter::new(TimestampFormat::default());
    /// let attr = rewriter.rewrite(&[], Attr::new("level", Level::FATAL));
    /// assert_eq!(attr.value, FieldValue::String("FATAL".to_string()));
    /// ```
    #[must_use]
    pub fn rewrite(&self, groups: &[String], mut attr: Attr) -> Attr {
        match (attr.key.as_str(), &attr.value) {
            (LEVEL_KEY, FieldValue::Level(level)) => {
                attr.value = FieldValue::String(level.name().into_owned());
            }
            (TIME_KEY, FieldValue::Time(created)) if groups.is_empty() => {
                let instant = match self.capture {
                    TimestampCapture::Render => Utc::now(),
                    TimestampCapture::Record => *created,
                };
                let formatted = self.format.format(&instant);
                attr.value = match formatted.parse::<i64>() {
                    Ok(seconds) if self.format.is_numeric() => FieldValue::Int(seconds),
                    _ => FieldValue::String(formatted),
                };
            }
            _ => {}
        }
        attr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use chrono::TimeZone;

    fn string(value: &str) -> FieldValue {
        FieldValue::String(value.to_string())
    }

    #[test]
    fn test_level_names_are_collapsed() {
        let rewriter = AttrRewriter::default();
        let cases = [
            (Level::TRACE, "TRACE"),
            (Level::from_rank(-20), "TRACE"),
            (Level::DEBUG, "DEBUG"),
            (Level::INFO, "INFO"),
            (Level::WARN, "WARN"),
            (Level::ERROR, "ERROR"),
            (Level::FATAL, "FATAL"),
            (Level::from_rank(40), "FATAL"),
        ];
        for (level, expected) in cases {
            let attr = rewriter.rewrite(&[], Attr::new(LEVEL_KEY, level));
            assert_eq!(attr.value, string(expected), "rank {}", level.rank());
        }
    }

    #[test]
    fn test_record_capture_uses_creation_time() {
        let created = Utc.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).single().unwrap();
        let rewriter = AttrRewriter::new(TimestampFormat::Custom("%Y-%m-%d".to_string()))
            .with_capture(TimestampCapture::Record);

        let attr = rewriter.rewrite(&[], Attr::new(TIME_KEY, created));
        assert_eq!(attr.value, string("2001-02-03"));
    }

    #[test]
    fn test_render_capture_restamps() {
        let created = Utc.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).single().unwrap();
        let rewriter = AttrRewriter::new(TimestampFormat::Custom("%Y".to_string()));

        let attr = rewriter.rewrite(&[], Attr::new(TIME_KEY, created));
        assert_eq!(attr.value, string(&Utc::now().format("%Y").to_string()));
        assert_ne!(attr.value, string("2001"));
    }

    #[test]
    fn test_unix_formats_stay_numeric() {
        let created = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).single().unwrap();
        let rewriter = AttrRewriter::new(TimestampFormat::Unix).with_capture(TimestampCapture::Record);

        let attr = rewriter.rewrite(&[], Attr::new(TIME_KEY, created));
        assert_eq!(attr.value, FieldValue::Int(1736332245));

        // Digits from a custom pattern are still text
        let rewriter = AttrRewriter::new(TimestampFormat::Custom("%Y".to_string()))
            .with_capture(TimestampCapture::Record);
        let attr = rewriter.rewrite(&[], Attr::new(TIME_KEY, created));
        assert_eq!(attr.value, string("2025"));
    }

    #[test]
    fn test_grouped_time_is_untouched() {
        let created = Utc.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).single().unwrap();
        let rewriter = AttrRewriter::default();
        let groups = vec!["request".to_string()];

        let attr = rewriter.rewrite(&groups, Attr::new(TIME_KEY, created));
        assert_eq!(attr.value, FieldValue::Time(created));
    }

    #[test]
    fn test_other_fields_pass_through() {
        let rewriter = AttrRewriter::default();
        let attr = Attr::new("sessionId", 1234);
        assert_eq!(rewriter.rewrite(&[], attr.clone()), attr);

        // A caller field named "level" that is not a level value is left alone
        let attr = Attr::new(LEVEL_KEY, "custom");
        assert_eq!(rewriter.rewrite(&[], attr.clone()), attr);
    }
}
