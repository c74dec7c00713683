//! # sigflow dialog-core
//!
//! Correlation engine for decoded SS7 signaling traces. Packets arrive already
//! dissected (TCAP dialogue layer plus a GSM MAP or CAP application layer) and
//! this crate reconstructs what single packets do not carry alone:
//!
//! - [`dialog`]: groups packets into per-dialogue transcripts keyed by OTID
//! - [`transaction`]: tracks Invoke components across a dialogue and reports the
//!   ones that were never answered or were answered with an error, backfilling
//!   subscriber identities seen elsewhere in the dialogue
//! - [`store`]: named traces shared between concurrent readers
//! - [`analysis`]: per-trace statistics, search and paged listing
//!
//! ## Flow
//!
//! ```text
//! packets ─┬─► DialogueBuilder ───────────────► Vec<Dialogue>
//!          └─► Correlator ─► IdentityIndex ───► Vec<UnansweredRequest>
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use sigflow_dialog_core::{build_dialogues, find_unanswered, DecodedPacket};
//!
//! let packets: Vec<DecodedPacket> = Vec::new();
//! assert!(build_dialogues(&packets).is_empty());
//! assert!(find_unanswered(&packets).is_empty());
//! ```

pub mod analysis;
pub mod config;
pub mod dialog;
pub mod errors;
pub mod packet;
pub mod store;
pub mod transaction;

pub use analysis::{PacketPage, PacketQuery, PacketSummary, SearchHit, TraceStats};
pub use config::{CorrelationConfig, DtidPolicy, ErrorProbeOrder};
pub use dialog::{Dialogue, DialogueBuilder, DialogueMessage, build_dialogues, build_dialogues_with};
pub use errors::{TraceError, TraceResult};
pub use packet::{
    CapInfo, ComponentKind, DecodedPacket, GsmMapInfo, MessageKind, SubscriberIds, TcapComponent,
    TcapInfo,
};
pub use store::TraceStore;
pub use transaction::{Correlator, IdentityIndex, RequestStatus, UnansweredRequest, find_unanswered};
