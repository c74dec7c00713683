//! Filtered, paged packet listing

use serde::{Deserialize, Serialize};

use crate::packet::DecodedPacket;

pub const DEFAULT_PAGE_LIMIT: usize = 500;

/// Listing filter; empty strings disable a filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacketQuery {
    /// Keep packets containing this protocol (case-insensitive)
    pub proto: String,
    /// Keep packets matching this text (case-insensitive)
    pub search: String,
    pub offset: usize,
    pub limit: usize,
}

impl Default for PacketQuery {
    fn default() -> Self {
        Self {
            proto: String::new(),
            search: String::new(),
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PacketQuery {
    pub fn with_proto(mut self, proto: impl Into<String>) -> Self {
        self.proto = proto.into();
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }
}

/// One row of a packet listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketSummary {
    pub frame_num: u64,
    pub time_rel: String,
    pub time_epoch: String,
    pub src: String,
    pub dst: String,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<String>,
    pub length: u64,
    pub info: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcap_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_op: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_op: Option<String>,
}

impl From<&DecodedPacket> for PacketSummary {
    fn from(packet: &DecodedPacket) -> Self {
        Self {
            frame_num: packet.frame_num,
            time_rel: packet.time_rel.clone(),
            time_epoch: packet.time_epoch.clone(),
            src: packet.src.clone(),
            dst: packet.dst.clone(),
            protocol: packet.protocol.clone(),
            protocols: packet.protocols.clone(),
            length: packet.length,
            info: packet.summary_info(),
            tcap_type: packet.tcap.as_ref().map(|t| t.message_type.to_string()),
            map_op: packet.map_op().map(str::to_string),
            cap_op: packet.cap_op().map(str::to_string),
        }
    }
}

/// A page of the filtered listing; `total` counts all matches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketPage {
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub packets: Vec<PacketSummary>,
}

pub fn list_packets(packets: &[DecodedPacket], query: &PacketQuery) -> PacketPage {
    let needle = query.search.to_lowercase();
    let matching: Vec<&DecodedPacket> = packets
        .iter()
        .filter(|p| query.proto.is_empty() || p.has_protocol(&query.proto))
        .filter(|p| needle.is_empty() || p.matches_text(&needle))
        .collect();

    let page = matching
        .iter()
        .skip(query.offset)
        .take(query.limit)
        .map(|p| PacketSummary::from(*p))
        .collect();

    PacketPage {
        total: matching.len(),
        offset: query.offset,
        limit: query.limit,
        packets: page,
    }
}
