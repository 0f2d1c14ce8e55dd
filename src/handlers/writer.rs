//! Backend that renders records into any `io::Write`

use crate::core::{
    Attr, AttrRewriter, Handler, Level, LevelVar, LoggerError, OutputFormat, Record, Result,
    ScopedAttr,
};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Options shared by every writer backend of a logger
#[derive(Debug, Clone)]
pub struct HandlerOptions {
    /// Minimum level, usually the logger's shared cell
    pub level: Arc<LevelVar>,
    /// Field rewriter; without one, levels and times render natively
    pub rewriter: Option<Arc<AttrRewriter>>,
    pub format: OutputFormat,
    /// Colour the level value (text format only)
    pub colors: bool,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            level: Arc::new(LevelVar::default()),
            rewriter: None,
            format: OutputFormat::default(),
            colors: false,
        }
    }
}

impl HandlerOptions {
    #[must_use]
    pub fn new(level: Arc<LevelVar>) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_rewriter(mut self, rewriter: Arc<AttrRewriter>) -> Self {
        self.rewriter = Some(rewriter);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }
}

/// Writes one line per record to a mutex-guarded writer
///
/// Each record is encoded in full before the lock is taken and then written
/// with a single `write_all`, so lines from concurrent callers never
/// interleave.
///
/// # Examples
///
/// ```
/// use fanout_logger::handlers::{HandlerOptions, WriterHandler};
/// use fanout_logger::{Attr, Handler, Level, Record};
///
/// let handler = WriterHandler::new("buffer", Vec::new(), HandlerOptions::default());
/// let handler = handler.with_attrs(&[Attr::new("service", "billing")]);
/// handler.handle(&Record::new(Level::INFO, "started")).unwrap();
/// ```
pub struct WriterHandler<W> {
    name: Arc<str>,
    writer: Arc<Mutex<W>>,
    options: Arc<HandlerOptions>,
    groups: Arc<[String]>,
    attrs: Arc<[ScopedAttr]>,
}

impl<W> Clone for WriterHandler<W> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            writer: Arc::clone(&self.writer),
            options: Arc::clone(&self.options),
            groups: Arc::clone(&self.groups),
            attrs: Arc::clone(&self.attrs),
        }
    }
}

impl<W: Write + Send + 'static> WriterHandler<W> {
    pub fn new(name: impl Into<String>, writer: W, options: HandlerOptions) -> Self {
        Self {
            name: Arc::from(name.into()),
            writer: Arc::new(Mutex::new(writer)),
            options: Arc::new(options),
            groups: Arc::from(Vec::new()),
            attrs: Arc::from(Vec::new()),
        }
    }

    /// The destination writer, shared with every handler derived from this one
    pub fn writer(&self) -> &Arc<Mutex<W>> {
        &self.writer
    }

    pub fn options(&self) -> &HandlerOptions {
        &self.options
    }

    fn rewrite(&self, groups: &[String], attr: Attr) -> Attr {
        match self.options.rewriter {
            Some(ref rewriter) => rewriter.rewrite(groups, attr),
            None => attr,
        }
    }

    /// Encode one record as a complete line
    fn render(&self, record: &Record) -> String {
        let mut fields =
            Vec::with_capacity(3 + self.attrs.len() + record.attrs().len());

        for attr in record.builtin_attrs() {
            let attr = self.rewrite(&[], attr);
            if !attr.key.is_empty() {
                fields.push(ScopedAttr::top_level(attr));
            }
        }

        fields.extend(self.attrs.iter().cloned());

        for attr in record.attrs() {
            let attr = self.rewrite(&self.groups, attr.clone());
            if !attr.key.is_empty() {
                fields.push(ScopedAttr::new(Arc::clone(&self.groups), attr));
            }
        }

        let mut line = self.options.format.encode(&fields, self.options.colors);
        line.push('\n');
        line
    }
}

impl<W: Write + Send + 'static> Handler for WriterHandler<W> {
    fn enabled(&self, level: Level) -> bool {
        self.options.level.allows(level)
    }

    fn handle(&self, record: &Record) -> Result<()> {
        let line = self.render(record);

        let mut writer = self.writer.lock();
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| LoggerError::delivery(self.name.as_ref(), e))
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler> {
        let mut derived = self.clone();
        if !attrs.is_empty() {
            let mut scoped: Vec<ScopedAttr> = self.attrs.to_vec();
            for attr in attrs {
                let attr = self.rewrite(&self.groups, attr.clone());
                if !attr.key.is_empty() {
                    scoped.push(ScopedAttr::new(Arc::clone(&self.groups), attr));
                }
            }
            derived.attrs = Arc::from(scoped);
        }
        Arc::new(derived)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        let mut derived = self.clone();
        if !name.is_empty() {
            let mut groups = self.groups.to_vec();
            groups.push(name.to_string());
            derived.groups = Arc::from(groups);
        }
        Arc::new(derived)
    }

    fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .flush()
            .map_err(|e| LoggerError::delivery(self.name.as_ref(), e))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimestampFormat;

    fn lines(handler: &WriterHandler<Vec<u8>>) -> Vec<String> {
        String::from_utf8(handler.writer().lock().clone())
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    fn rewriting_options() -> HandlerOptions {
        HandlerOptions::new(Arc::new(LevelVar::new(Level::TRACE))).with_rewriter(Arc::new(
            AttrRewriter::new(TimestampFormat::Custom("%Y".to_string())),
        ))
    }

    #[test]
    fn test_text_line_layout() {
        let handler = WriterHandler::new("buf", Vec::new(), rewriting_options());
        let record = Record::new(Level::TRACE, "hello, nlog!").with_attrs([Attr::new("sessionId", 1234)]);
        handler.handle(&record).unwrap();

        let lines = lines(&handler);
        assert_eq!(lines.len(), 1);
        let expected_time = chrono::Utc::now().format("%Y").to_string();
        assert_eq!(
            lines[0],
            format!("time={} level=TRACE msg=\"hello, nlog!\" sessionId=1234", expected_time)
        );
    }

    #[test]
    fn test_without_rewriter_uses_native_names() {
        let options = HandlerOptions::new(Arc::new(LevelVar::new(Level::TRACE)));
        let handler = WriterHandler::new("buf", Vec::new(), options);
        handler.handle(&Record::new(Level::FATAL, "x")).unwrap();

        assert!(lines(&handler)[0].contains("level=ERROR+4"));
    }

    #[test]
    fn test_with_attrs_and_group() {
        let handler = WriterHandler::new("buf", Vec::new(), rewriting_options());
        let derived = handler
            .with_attrs(&[Attr::new("interfaceName", "data")])
            .with_group("req");
        let record = Record::new(Level::INFO, "served").with_attrs([Attr::new("status", 200)]);
        derived.handle(&record).unwrap();
        handler.handle(&Record::new(Level::INFO, "plain")).unwrap();

        let lines = lines(&handler);
        assert!(lines[0].ends_with("msg=served interfaceName=data req.status=200"));
        assert!(lines[1].ends_with("msg=plain"));
    }

    #[test]
    fn test_json_groups_nest() {
        let options = rewriting_options().with_format(OutputFormat::Json);
        let handler = WriterHandler::new("buf", Vec::new(), options);
        let derived = handler.with_group("db");
        derived
            .handle(&Record::new(Level::WARN, "slow query").with_attrs([Attr::new("ms", 950)]))
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&lines(&handler)[0]).unwrap();
        assert_eq!(parsed["level"], "WARN");
        assert_eq!(parsed["msg"], "slow query");
        assert_eq!(parsed["db"]["ms"], 950);
    }

    #[test]
    fn test_empty_group_is_ignored() {
        let handler = WriterHandler::new("buf", Vec::new(), rewriting_options());
        let derived = handler.with_group("");
        derived
            .handle(&Record::new(Level::INFO, "m").with_attrs([Attr::new("k", 1)]))
            .unwrap();
        assert!(lines(&handler)[0].ends_with(" k=1"));
    }

    #[test]
    fn test_enabled_reads_shared_floor() {
        let level = Arc::new(LevelVar::new(Level::WARN));
        let handler = WriterHandler::new("buf", Vec::new(), HandlerOptions::new(Arc::clone(&level)));
        assert!(!handler.enabled(Level::INFO));
        level.set(Level::DEBUG);
        assert!(handler.enabled(Level::INFO));
    }

    #[test]
    fn test_write_failure_is_delivery_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let handler = WriterHandler::new("file", Broken, HandlerOptions::default());
        let err = handler.handle(&Record::new(Level::ERROR, "x")).unwrap_err();
        assert!(matches!(err, LoggerError::Delivery { ref handler, .. } if handler == "file"));
    }
}
