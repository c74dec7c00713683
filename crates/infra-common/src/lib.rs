//! # sigflow infra-common
//!
//! Shared infrastructure for the sigflow crates:
//!
//! - [`logging`]: subscriber setup driven by [`LoggingConfig`] and span-scoped
//!   [`LogContext`]s for correlation passes
//! - [`errors`]: the common [`Error`] type and the [`ErrorExt`] context helpers

pub mod errors;
pub mod logging;

pub use errors::{Error, ErrorContext, ErrorExt, Result};
pub use logging::{LogContext, LoggingConfig, setup_logging};
