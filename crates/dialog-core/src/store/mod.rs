//! Trace storage
//!
//! Traces are held as immutable `Arc<[DecodedPacket]>` snapshots behind a
//! reader/writer lock. A query clones the snapshot under the read lock and
//! correlates outside of it, so concurrent passes never block each other and
//! a replacement can never be observed half-applied.

pub mod trace_store;

pub use trace_store::{TraceSnapshot, TraceStore};
