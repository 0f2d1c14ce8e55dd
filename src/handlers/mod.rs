//! Backend implementations

pub mod console;
pub mod file;
pub mod rotating_file;
pub mod writer;

pub use console::ConsoleHandler;
pub use file::FileHandler;
pub use rotating_file::{RotatingWriter, RotationPolicy};
pub use writer::{HandlerOptions, WriterHandler};

pub use crate::core::Handler;
