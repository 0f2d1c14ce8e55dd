//! Basic logger usage example
//!
//! Demonstrates console logging, the extended levels and derived loggers.
//!
//! Run with: cargo run --example basic_usage

use fanout_logger::prelude::*;
use fanout_logger::{info, warn};

fn main() -> Result<()> {
    println!("=== Fanout Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .console(true)
        .console_colors(true)
        .level("trace")
        .timestamp_format(TimestampFormat::Custom("%H:%M:%S%.3f".to_string()))
        .build()?;

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.fatal("This is a fatal message");

    println!("\n2. Logging with a higher minimum level:");
    logger.set_level(Level::INFO);
    println!("   Minimum level set to INFO - trace and debug won't show:");
    logger.trace("Trace message (hidden)");
    logger.debug("Debug message (hidden)");
    info!(logger, "Info message {} ({})", 1, "visible");
    warn!(logger, "Warning message (visible)");

    println!("\n3. Fields and groups:");
    let request = logger
        .with([Attr::new("request_id", "abc-123")])
        .with_group("http");
    request.log_attrs(
        Level::INFO,
        "request served",
        [Attr::new("status", 200), Attr::new("ms", 12)],
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
