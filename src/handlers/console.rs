//! Console backend

use super::writer::{HandlerOptions, WriterHandler};
use std::io::{self, Stdout};

/// Writer backend over standard output
pub type ConsoleHandler = WriterHandler<Stdout>;

impl WriterHandler<Stdout> {
    /// A backend writing one line per record to stdout
    ///
    /// # Examples
    ///
    /// ```
    /// use fanout_logger::handlers::{ConsoleHandler, HandlerOptions};
    /// use fanout_logger::{Handler, Level, Record};
    ///
    /// let console = ConsoleHandler::stdout(HandlerOptions::default().with_colors(true));
    /// console.handle(&Record::new(Level::INFO, "ready")).unwrap();
    /// ```
    pub fn stdout(options: HandlerOptions) -> Self {
        WriterHandler::new("console", io::stdout(), options)
    }
}
