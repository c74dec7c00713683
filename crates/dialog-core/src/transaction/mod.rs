//! Invoke tracking across TCAP dialogues
//!
//! - [`correlator`]: the pending-invoke pass and its report
//! - [`enrichment`]: the transaction id → subscriber identity side index
//! - [`key`]: `(transaction id, invoke id)` correlation keys

pub mod correlator;
pub mod enrichment;
pub mod key;
pub mod report;

pub use correlator::{CorrelationPass, Correlator, find_unanswered};
pub use enrichment::IdentityIndex;
pub use key::InvokeKey;
pub use report::{RequestStatus, UnansweredRequest};
