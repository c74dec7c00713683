//! Packet fixtures shared by the integration tests

#![allow(dead_code)]

use sigflow_dialog_core::{
    ComponentKind, DecodedPacket, GsmMapInfo, MessageKind, TcapComponent, TcapInfo,
};

/// Fluent builder for a single decoded TCAP frame
pub struct PacketBuilder {
    packet: DecodedPacket,
}

impl PacketBuilder {
    pub fn new(frame_num: u64, message_type: MessageKind) -> Self {
        Self {
            packet: DecodedPacket {
                frame_num,
                time_rel: format!("{}.000000", frame_num),
                src: "10.0.0.1".into(),
                dst: "10.0.0.2".into(),
                protocol: "gsm_map".into(),
                protocols: ["sctp", "m3ua", "sccp", "tcap", "gsm_map"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                tcap: Some(TcapInfo {
                    message_type,
                    ..Default::default()
                }),
                ..Default::default()
            },
        }
    }

    pub fn otid(mut self, otid: &str) -> Self {
        self.tcap().otid = otid.into();
        self
    }

    pub fn dtid(mut self, dtid: &str) -> Self {
        self.tcap().dtid = dtid.into();
        self
    }

    pub fn component(mut self, kind: ComponentKind, invoke_id: &str, op_code: &str) -> Self {
        self.tcap().components.push(TcapComponent {
            kind,
            invoke_id: invoke_id.into(),
            op_code: op_code.into(),
        });
        self
    }

    pub fn map_op(mut self, op_name: &str) -> Self {
        self.map().op_name = op_name.into();
        self
    }

    pub fn imsi(mut self, imsi: &str) -> Self {
        self.map().imsi = imsi.into();
        self
    }

    pub fn msisdn(mut self, msisdn: &str) -> Self {
        self.map().msisdn = msisdn.into();
        self
    }

    pub fn build(self) -> DecodedPacket {
        self.packet
    }

    fn tcap(&mut self) -> &mut TcapInfo {
        self.packet.tcap.get_or_insert_with(TcapInfo::default)
    }

    fn map(&mut self) -> &mut GsmMapInfo {
        self.packet.gsm_map.get_or_insert_with(GsmMapInfo::default)
    }
}

pub fn begin(frame_num: u64) -> PacketBuilder {
    PacketBuilder::new(frame_num, MessageKind::Begin)
}

pub fn continue_(frame_num: u64) -> PacketBuilder {
    PacketBuilder::new(frame_num, MessageKind::Continue)
}

pub fn end(frame_num: u64) -> PacketBuilder {
    PacketBuilder::new(frame_num, MessageKind::End)
}

pub fn unidirectional(frame_num: u64) -> PacketBuilder {
    PacketBuilder::new(frame_num, MessageKind::Unidirectional)
}

/// A frame with no TCAP layer at all
pub fn plain(frame_num: u64) -> DecodedPacket {
    DecodedPacket {
        frame_num,
        protocol: "sctp".into(),
        protocols: vec!["sctp".into()],
        ..Default::default()
    }
}
