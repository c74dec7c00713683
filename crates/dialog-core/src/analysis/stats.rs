//! Per-trace statistics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::packet::DecodedPacket;

/// Distribution counters over one trace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStats {
    pub total_packets: usize,
    /// Keyed by each packet's highest-level protocol
    pub protocol_dist: BTreeMap<String, usize>,
    /// Keyed by every protocol a packet contains
    pub all_protocols_dist: BTreeMap<String, usize>,
    pub tcap_message_types: BTreeMap<String, usize>,
    pub gsm_map_operations: BTreeMap<String, usize>,
    pub cap_operations: BTreeMap<String, usize>,
}

impl TraceStats {
    pub fn observe(&mut self, packet: &DecodedPacket) {
        self.total_packets += 1;
        *self.protocol_dist.entry(packet.protocol.clone()).or_default() += 1;
        for proto in &packet.protocols {
            *self.all_protocols_dist.entry(proto.clone()).or_default() += 1;
        }

        let tcap_type = packet.tcap_type();
        if !tcap_type.is_empty() {
            *self.tcap_message_types.entry(tcap_type.to_string()).or_default() += 1;
        }
        if let Some(op) = packet.map_op_name() {
            *self.gsm_map_operations.entry(op.to_string()).or_default() += 1;
        }
        if let Some(op) = packet.cap_op() {
            *self.cap_operations.entry(op.to_string()).or_default() += 1;
        }
    }
}

/// Compute statistics over a packet sequence
pub fn trace_stats(packets: &[DecodedPacket]) -> TraceStats {
    let mut stats = TraceStats::default();
    for packet in packets {
        stats.observe(packet);
    }
    stats
}
