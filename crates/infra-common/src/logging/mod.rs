//! Logging setup and contextual spans

pub mod context;
pub mod setup;

pub use context::{LogContext, with_context};
pub use setup::{LoggingConfig, log_welcome, parse_log_level, setup_logging};
