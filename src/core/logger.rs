//! Main logger implementation

use super::{
    attr::Attr,
    error::Result,
    fanout::FanoutHandler,
    handler::Handler,
    level::{Level, LevelVar},
    metrics::LoggerMetrics,
    output_format::OutputFormat,
    record::Record,
    rewriter::{AttrRewriter, TimestampCapture},
    timestamp::TimestampFormat,
};
use crate::handlers::{ConsoleHandler, FileHandler, HandlerOptions, RotationPolicy, WriterHandler};
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// The object applications log through
///
/// A call is checked against the shared minimum level first; only calls that
/// pass are formatted and handed to every backend in configuration order.
/// Cloning is cheap and clones share backends, level and metrics.
#[derive(Clone)]
pub struct Logger {
    handler: Arc<FanoutHandler>,
    level: Arc<LevelVar>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// A logger without backends and an INFO floor
    #[must_use]
    pub fn new() -> Self {
        Self::from_fanout(FanoutHandler::new(Arc::new(LevelVar::default())))
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Wrap an assembled backend set; the logger gates on the set's level cell
    #[must_use]
    pub fn from_fanout(handler: FanoutHandler) -> Self {
        Self {
            level: Arc::clone(handler.level()),
            handler: Arc::new(handler),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    pub fn handler(&self) -> &FanoutHandler {
        &self.handler
    }

    pub fn level(&self) -> Level {
        self.level.get()
    }

    pub fn set_level(&self, level: Level) {
        self.level.set(level);
    }

    /// Set the floor by name; unknown names leave it unchanged and return `false`
    pub fn set_level_name(&self, name: &str) -> bool {
        self.level.set_by_name(name)
    }

    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        self.level.allows(level)
    }

    fn gate(&self, level: Level) -> bool {
        let pass = self.enabled(level);
        if !pass {
            self.metrics.record_filtered();
        }
        pass
    }

    /// Format and deliver `args` at `level`, swallowing delivery errors
    ///
    /// This is what the logging macros expand to. Arguments are only rendered
    /// once the call has passed the level gate, and a template without
    /// arguments is used verbatim.
    pub fn log_args(&self, level: Level, args: fmt::Arguments<'_>) {
        if !self.gate(level) {
            return;
        }
        self.deliver(Record::new(level, render_message(args)));
    }

    /// Deliver a pre-built message at `level`, swallowing delivery errors
    pub fn log(&self, level: Level, message: impl Into<String>) {
        if !self.gate(level) {
            return;
        }
        self.deliver(Record::new(level, message));
    }

    /// Deliver a message with per-call fields, swallowing delivery errors
    pub fn log_attrs<I>(&self, level: Level, message: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        if !self.gate(level) {
            return;
        }
        self.deliver(Record::new(level, message).with_attrs(attrs));
    }

    /// Like [`log_args`](Self::log_args) but returns the first backend error
    ///
    /// # Errors
    ///
    /// Returns the delivery error of the first failing backend; backends after
    /// it did not receive the record.
    pub fn try_log(&self, level: Level, args: fmt::Arguments<'_>) -> Result<()> {
        if !self.gate(level) {
            return Ok(());
        }
        self.dispatch(&Record::new(level, render_message(args)))
    }

    fn dispatch(&self, record: &Record) -> Result<()> {
        match self.handler.deliver(record) {
            Ok(0) => {
                self.metrics.record_unhandled();
                Ok(())
            }
            Ok(_) => {
                self.metrics.record_delivered();
                Ok(())
            }
            Err(e) => {
                self.metrics.record_failed();
                Err(e)
            }
        }
    }

    fn deliver(&self, record: Record) {
        if let Err(e) = self.dispatch(&record) {
            eprintln!("[LOGGER ERROR] {} (record level {})", e, record.level);
        }
    }

    /// A logger whose records all carry `attrs`
    ///
    /// # Example
    ///
    /// ```
    /// use fanout_logger::{Attr, Logger};
    ///
    /// let logger = Logger::new();
    /// let request_logger = logger.with([Attr::new("request_id", "abc-123")]);
    /// request_logger.info("handled");
    /// ```
    #[must_use]
    pub fn with<I>(&self, attrs: I) -> Logger
    where
        I: IntoIterator<Item = Attr>,
    {
        let attrs: Vec<Attr> = attrs.into_iter().collect();
        self.derive(self.handler.derive_attrs(&attrs))
    }

    /// A logger that nests every later field under `name`
    #[must_use]
    pub fn with_group(&self, name: &str) -> Logger {
        self.derive(self.handler.derive_group(name))
    }

    fn derive(&self, handler: FanoutHandler) -> Logger {
        Logger {
            handler: Arc::new(handler),
            level: Arc::clone(&self.level),
            metrics: Arc::clone(&self.metrics),
        }
    }

    /// Get the logger metrics for observability
    ///
    /// # Example
    ///
    /// ```
    /// use fanout_logger::Logger;
    ///
    /// let logger = Logger::new();
    /// logger.debug("below the default floor");
    /// assert_eq!(logger.metrics().filtered_count(), 1);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        self.handler.flush()
    }

    #[inline]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(Level::TRACE, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::DEBUG, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::INFO, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::WARN, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::ERROR, message);
    }

    /// Log at FATAL; this never terminates the process
    #[inline]
    pub fn fatal(&self, message: impl Into<String>) {
        self.log(Level::FATAL, message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

fn render_message(args: fmt::Arguments<'_>) -> String {
    match args.as_str() {
        Some(literal) => literal.to_owned(),
        None => args.to_string(),
    }
}

enum PendingBackend {
    Console,
    File { path: PathBuf, policy: RotationPolicy },
    Writer { name: String, writer: Box<dyn Write + Send> },
    Custom(Arc<dyn Handler>),
}

/// Builder for [`Logger`]
///
/// Options are collected and applied together in [`build`](Self::build), so
/// their order does not matter: a timestamp format set after `console(true)`
/// still applies to the console. Backends keep the order they were added in.
///
/// # Example
///
/// ```no_run
/// use fanout_logger::handlers::RotationPolicy;
/// use fanout_logger::{Logger, TimestampFormat};
///
/// let logger = Logger::builder()
///     .console(true)
///     .file("/var/log/app.log", RotationPolicy::new().with_max_size_mb(10))
///     .level("trace")
///     .timestamp_format(TimestampFormat::Custom("%Y-%m-%d %H:%M:%S".to_string()))
///     .build()
///     .unwrap();
///
/// logger.trace("hello, logger!");
/// ```
pub struct LoggerBuilder {
    backends: Vec<PendingBackend>,
    level: Level,
    timestamp_format: TimestampFormat,
    timestamp_capture: TimestampCapture,
    output_format: OutputFormat,
    console_colors: bool,
}

impl LoggerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
            level: Level::INFO,
            timestamp_format: TimestampFormat::default(),
            timestamp_capture: TimestampCapture::default(),
            output_format: OutputFormat::default(),
            console_colors: false,
        }
    }

    /// Enable or disable the stdout backend
    #[must_use]
    pub fn console(mut self, enabled: bool) -> Self {
        self.backends.retain(|b| !matches!(b, PendingBackend::Console));
        if enabled {
            self.backends.push(PendingBackend::Console);
        }
        self
    }

    #[must_use]
    pub fn console_colors(mut self, enabled: bool) -> Self {
        self.console_colors = enabled;
        self
    }

    /// Add a rotating file backend
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>, policy: RotationPolicy) -> Self {
        self.backends.push(PendingBackend::File {
            path: path.into(),
            policy,
        });
        self
    }

    /// Add a backend over any writer
    #[must_use]
    pub fn writer<W>(mut self, name: impl Into<String>, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        self.backends.push(PendingBackend::Writer {
            name: name.into(),
            writer: Box::new(writer),
        });
        self
    }

    /// Add a fully configured backend as-is
    #[must_use]
    pub fn handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.backends.push(PendingBackend::Custom(handler));
        self
    }

    /// Set the minimum level by name; unknown names are ignored
    #[must_use]
    pub fn level(mut self, name: &str) -> Self {
        if let Some(level) = Level::lookup(name) {
            self.level = level;
        }
        self
    }

    #[must_use]
    pub fn min_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn timestamp_capture(mut self, capture: TimestampCapture) -> Self {
        self.timestamp_capture = capture;
        self
    }

    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Construct every backend and freeze the configuration
    ///
    /// # Errors
    ///
    /// Returns error if a file backend cannot be opened
    pub fn build(self) -> Result<Logger> {
        let LoggerBuilder {
            backends,
            level,
            timestamp_format,
            timestamp_capture,
            output_format,
            console_colors,
        } = self;

        let level = Arc::new(LevelVar::new(level));
        let rewriter =
            Arc::new(AttrRewriter::new(timestamp_format).with_capture(timestamp_capture));
        let options = HandlerOptions::new(Arc::clone(&level))
            .with_rewriter(rewriter)
            .with_format(output_format);

        let mut fanout = FanoutHandler::new(level);
        for pending in backends {
            let handler: Arc<dyn Handler> = match pending {
                PendingBackend::Console => Arc::new(ConsoleHandler::stdout(
                    options.clone().with_colors(console_colors),
                )),
                PendingBackend::File { path, policy } => {
                    Arc::new(FileHandler::file(path, policy, options.clone())?)
                }
                PendingBackend::Writer { name, writer } => {
                    Arc::new(WriterHandler::new(name, writer, options.clone()))
                }
                PendingBackend::Custom(handler) => handler,
            };
            fanout.push(handler);
        }

        Ok(Logger::from_fanout(fanout))
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
