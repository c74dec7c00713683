//! Error types for dialog-core
//!
//! The correlation engine itself never fails: partial packets degrade into
//! less complete results. Errors only surface at the trace store boundary and
//! when loading decoded exports.

use thiserror::Error;

/// Result type for trace store and loader operations
pub type TraceResult<T> = Result<T, TraceError>;

#[derive(Debug, Error)]
pub enum TraceError {
    /// No trace is stored under the requested name (or no trace at all)
    #[error("Trace not found: {0}")]
    TraceNotFound(String),

    /// The trace exists but holds no packet with this frame number
    #[error("Packet {frame} not found in trace {trace}")]
    PacketNotFound { trace: String, frame: u64 },

    /// A query was rejected before touching the trace
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The export parsed as JSON but is not a shape the loader can place
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// The decoded export could not be deserialized
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The decoded export could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TraceError {
    pub fn trace_not_found(name: impl Into<String>) -> Self {
        Self::TraceNotFound(name.into())
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }

    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat(message.into())
    }

    /// True for the not-found family, which callers usually map to a 404-style answer
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TraceNotFound(_) | Self::PacketNotFound { .. })
    }
}
