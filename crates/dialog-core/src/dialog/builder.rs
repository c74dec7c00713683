//! Dialogue Builder
//!
//! Groups packets by OTID in a single pass. Input order is trusted as time
//! order and is never re-sorted.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::DtidPolicy;
use crate::packet::DecodedPacket;

/// Per-message summary inside a dialogue transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueMessage {
    pub frame_num: u64,
    pub time_rel: String,
    pub src: String,
    pub dst: String,
    pub tcap_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_op: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_op: Option<String>,
}

impl DialogueMessage {
    fn from_packet(packet: &DecodedPacket) -> Self {
        Self {
            frame_num: packet.frame_num,
            time_rel: packet.time_rel.clone(),
            src: packet.src.clone(),
            dst: packet.dst.clone(),
            tcap_type: packet.tcap_type().to_string(),
            map_op: packet.map_op_name().map(str::to_string),
            cap_op: packet.cap_op().map(str::to_string),
        }
    }
}

/// A TCAP dialogue transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialogue {
    pub otid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dtid: String,
    pub messages: Vec<DialogueMessage>,
}

impl Dialogue {
    fn new(otid: &str) -> Self {
        Self {
            otid: otid.to_string(),
            dtid: String::new(),
            messages: Vec::new(),
        }
    }

    /// Whether the responder has assigned its transaction id
    pub fn is_answered(&self) -> bool {
        !self.dtid.is_empty()
    }
}

/// Incremental dialogue grouping
#[derive(Debug, Default)]
pub struct DialogueBuilder {
    policy: DtidPolicy,
    dialogues: IndexMap<String, Dialogue>,
}

impl DialogueBuilder {
    pub fn new(policy: DtidPolicy) -> Self {
        Self {
            policy,
            dialogues: IndexMap::new(),
        }
    }

    /// Fold one packet into the transcripts. Packets without an OTID are skipped.
    pub fn observe(&mut self, packet: &DecodedPacket) {
        let otid = packet.otid();
        if otid.is_empty() {
            return;
        }

        let dialogue = self
            .dialogues
            .entry(otid.to_string())
            .or_insert_with(|| Dialogue::new(otid));

        let dtid = packet.dtid();
        if !dtid.is_empty() {
            let keep_existing = self.policy == DtidPolicy::FirstSeen && dialogue.is_answered();
            if !keep_existing {
                dialogue.dtid = dtid.to_string();
            }
        }

        trace!(frame = packet.frame_num, otid, dtid, "dialogue message");
        dialogue.messages.push(DialogueMessage::from_packet(packet));
    }

    /// Dialogues in order of first appearance
    pub fn finish(self) -> Vec<Dialogue> {
        debug!("Built {} dialogues", self.dialogues.len());
        self.dialogues.into_values().collect()
    }
}

/// Group a packet sequence into dialogues with the default DTID policy
pub fn build_dialogues(packets: &[DecodedPacket]) -> Vec<Dialogue> {
    build_dialogues_with(packets, DtidPolicy::default())
}

/// Group a packet sequence into dialogues
pub fn build_dialogues_with(packets: &[DecodedPacket], policy: DtidPolicy) -> Vec<Dialogue> {
    let mut builder = DialogueBuilder::new(policy);
    for packet in packets {
        builder.observe(packet);
    }
    builder.finish()
}
