//! Backend set that delivers one record to several handlers

use super::{
    attr::Attr,
    error::Result,
    handler::Handler,
    level::{Level, LevelVar},
    record::Record,
};
use std::sync::Arc;

/// Ordered collection of backends behind one shared minimum level
///
/// Delivery stops at the first backend error; later backends do not see the
/// record.
///
/// # Example
///
/// ```
/// use fanout_logger::{FanoutHandler, Handler, Level, LevelVar, Record};
/// use std::sync::Arc;
///
/// let floor = Arc::new(LevelVar::new(Level::INFO));
/// let fanout = FanoutHandler::new(floor);
///
/// assert!(fanout.is_empty());
/// assert!(!fanout.enabled(Level::DEBUG));
/// fanout.handle(&Record::new(Level::WARN, "nothing to do")).unwrap();
/// ```
#[derive(Clone)]
pub struct FanoutHandler {
    handlers: Vec<Arc<dyn Handler>>,
    level: Arc<LevelVar>,
}

impl FanoutHandler {
    pub fn new(level: Arc<LevelVar>) -> Self {
        Self {
            handlers: Vec::new(),
            level,
        }
    }

    pub fn push(&mut self, handler: Arc<dyn Handler>) {
        self.handlers.push(handler);
    }

    #[must_use]
    pub fn with_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.push(handler);
        self
    }

    pub fn handlers(&self) -> &[Arc<dyn Handler>] {
        &self.handlers
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn level(&self) -> &Arc<LevelVar> {
        &self.level
    }

    /// Same backends and floor, each passed through `f`
    fn derive<F>(&self, f: F) -> Self
    where
        F: Fn(&dyn Handler) -> Arc<dyn Handler>,
    {
        Self {
            handlers: self.handlers.iter().map(|h| f(h.as_ref())).collect(),
            level: Arc::clone(&self.level),
        }
    }

    /// Deliver `record` and return how many backends handled it
    ///
    /// Backends whose own `enabled` check rejects the record are skipped and
    /// not counted.
    ///
    /// # Errors
    ///
    /// Returns the first backend error; later backends are not attempted.
    pub fn deliver(&self, record: &Record) -> Result<usize> {
        let mut handled = 0;
        for handler in &self.handlers {
            if handler.enabled(record.level) {
                handler.handle(record)?;
                handled += 1;
            }
        }
        Ok(handled)
    }

    /// A new set whose backends all carry `attrs`
    #[must_use]
    pub fn derive_attrs(&self, attrs: &[Attr]) -> Self {
        self.derive(|handler| handler.with_attrs(attrs))
    }

    /// A new set whose backends all nest later attributes under `name`
    #[must_use]
    pub fn derive_group(&self, name: &str) -> Self {
        self.derive(|handler| handler.with_group(name))
    }
}

impl Handler for FanoutHandler {
    fn enabled(&self, level: Level) -> bool {
        self.level.allows(level)
    }

    fn handle(&self, record: &Record) -> Result<()> {
        self.deliver(record).map(|_| ())
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler> {
        Arc::new(self.derive_attrs(attrs))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(self.derive_group(name))
    }

    /// Flush every backend, returning the first error after trying all of them
    fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for handler in &self.handlers {
            if let Err(e) = handler.flush() {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "fanout"
    }
}
