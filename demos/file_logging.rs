//! File logging example
//!
//! Demonstrates logging to the console and a rotating file simultaneously.
//!
//! Run with: cargo run --example file_logging

use fanout_logger::prelude::*;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Fanout Logger - File Logging Example ===\n");

    let logger = Logger::builder()
        .console(true)
        .file(
            "logs/application.log",
            RotationPolicy::new()
                .with_max_size(4 * 1024)
                .with_max_backups(3)
                .with_max_age(Duration::from_secs(7 * 24 * 3600))
                .with_compression(true),
        )
        .level("debug")
        .build()?;

    println!("1. Logging to both console and file:");

    logger.info("Application started");
    logger.debug("Loading configuration...");
    logger.info("Configuration loaded successfully");
    logger.warn("Using default settings for some options");
    logger.error("Failed to load optional plugin");

    println!("\n2. Writing enough to trigger rotation:");

    for i in 1..=100 {
        logger.log_attrs(
            Level::INFO,
            format!("Processing item {}/100", i),
            [Attr::new("item", i)],
        );
    }

    logger.info("All operations completed");
    logger.flush()?;

    let metrics = logger.metrics();
    println!(
        "\nDelivered: {}, failed: {}, filtered: {}",
        metrics.delivered_count(),
        metrics.failed_count(),
        metrics.filtered_count()
    );

    println!("\n=== Example completed successfully! ===");
    println!("Check 'logs/' for the active file and compressed backups");

    Ok(())
}
