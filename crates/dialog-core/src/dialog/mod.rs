//! TCAP dialogues reconstructed from a packet sequence
//!
//! A dialogue is keyed by the originating transaction id of the packets that
//! belong to it; the responder's transaction id is picked up as it appears.
//!
//! ```text
//! Begin(otid=T1) → Continue(otid=T1, dtid=R7) → End(otid=T1, dtid=R7)
//!        └──────────────── Dialogue { otid: T1, dtid: R7, messages: [3] }
//! ```

pub mod builder;

pub use builder::{
    Dialogue, DialogueBuilder, DialogueMessage, build_dialogues, build_dialogues_with,
};
