//! Free-text search over decoded packets

use serde::{Deserialize, Serialize};

use crate::packet::DecodedPacket;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub frame_num: u64,
    pub protocol: String,
    pub src: String,
    pub dst: String,
    pub info: String,
}

impl SearchHit {
    fn from_packet(packet: &DecodedPacket) -> Self {
        Self {
            frame_num: packet.frame_num,
            protocol: packet.protocol.clone(),
            src: packet.src.clone(),
            dst: packet.dst.clone(),
            info: packet.summary_info(),
        }
    }
}

/// Case-insensitive substring search, in capture order
pub fn search_packets(packets: &[DecodedPacket], query: &str) -> Vec<SearchHit> {
    let needle = query.to_lowercase();
    packets
        .iter()
        .filter(|p| p.matches_text(&needle))
        .map(SearchHit::from_packet)
        .collect()
}
