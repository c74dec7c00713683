//! Trace-level views that do not need dialogue correlation

pub mod listing;
pub mod search;
pub mod stats;

pub use listing::{DEFAULT_PAGE_LIMIT, PacketPage, PacketQuery, PacketSummary, list_packets};
pub use search::{SearchHit, search_packets};
pub use stats::{TraceStats, trace_stats};
