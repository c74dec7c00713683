//! Field accessors shared by the builder, the correlator and the analysis views
//!
//! Every accessor is total: a missing layer reads as an empty value.

use serde::{Deserialize, Serialize};

use super::model::{DecodedPacket, TcapComponent};

/// Subscriber identities carried by a packet's application layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberIds {
    pub imsi: String,
    pub msisdn: String,
}

impl SubscriberIds {
    pub fn is_empty(&self) -> bool {
        self.imsi.is_empty() && self.msisdn.is_empty()
    }
}

impl DecodedPacket {
    /// Originating transaction id, empty without a TCAP layer
    pub fn otid(&self) -> &str {
        self.tcap.as_ref().map(|t| t.otid.as_str()).unwrap_or("")
    }

    /// Destination transaction id, empty without a TCAP layer
    pub fn dtid(&self) -> &str {
        self.tcap.as_ref().map(|t| t.dtid.as_str()).unwrap_or("")
    }

    pub fn components(&self) -> &[TcapComponent] {
        self.tcap.as_ref().map(|t| t.components.as_slice()).unwrap_or(&[])
    }

    /// TCAP message type as displayed, empty without a TCAP layer
    pub fn tcap_type(&self) -> &str {
        self.tcap.as_ref().map(|t| t.message_type.as_str()).unwrap_or("")
    }

    /// Subscriber identities; GSM MAP takes precedence over CAP, which has no MSISDN
    pub fn subscriber(&self) -> SubscriberIds {
        if let Some(map) = &self.gsm_map {
            SubscriberIds {
                imsi: map.imsi.clone(),
                msisdn: map.msisdn.clone(),
            }
        } else if let Some(cap) = &self.cap {
            SubscriberIds {
                imsi: cap.imsi.clone(),
                msisdn: String::new(),
            }
        } else {
            SubscriberIds::default()
        }
    }

    /// Application-layer operation: MAP name, else MAP code; CAP operation without MAP
    pub fn operation(&self) -> &str {
        if let Some(map) = &self.gsm_map {
            if map.op_name.is_empty() {
                map.op_code.as_str()
            } else {
                map.op_name.as_str()
            }
        } else if let Some(cap) = &self.cap {
            cap.operation.as_str()
        } else {
            ""
        }
    }

    /// MAP operation name only, as shown in dialogue transcripts
    pub fn map_op_name(&self) -> Option<&str> {
        self.gsm_map
            .as_ref()
            .map(|m| m.op_name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// MAP operation for listings: the name, else the raw code
    pub fn map_op(&self) -> Option<&str> {
        self.gsm_map
            .as_ref()
            .map(|m| if m.op_name.is_empty() { m.op_code.as_str() } else { m.op_name.as_str() })
            .filter(|op| !op.is_empty())
    }

    pub fn cap_op(&self) -> Option<&str> {
        self.cap
            .as_ref()
            .map(|c| c.operation.as_str())
            .filter(|op| !op.is_empty())
    }

    /// MAP error code, used when a ReturnError component carries none itself
    pub fn map_error_code(&self) -> &str {
        self.gsm_map.as_ref().map(|m| m.error_code.as_str()).unwrap_or("")
    }

    /// One-line description: `TCAP:<type> | MAP:<op> | CAP:<op>`, falling back
    /// to the protocol name and finally the raw info string
    pub fn summary_info(&self) -> String {
        let mut parts = Vec::new();
        let tcap_type = self.tcap_type();
        if !tcap_type.is_empty() {
            parts.push(format!("TCAP:{}", tcap_type));
        }
        if let Some(op) = self.map_op_name() {
            parts.push(format!("MAP:{}", op));
        }
        if let Some(op) = self.cap_op() {
            parts.push(format!("CAP:{}", op));
        }
        if !parts.is_empty() {
            return parts.join(" | ");
        }

        if !self.protocol.is_empty() && self.protocol != "unknown" {
            return self.protocol.to_uppercase();
        }
        self.info.clone()
    }

    /// Case-insensitive substring match over the searchable fields.
    /// `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        let mut fields: Vec<&str> = vec![
            self.src.as_str(),
            self.dst.as_str(),
            self.protocol.as_str(),
            self.info.as_str(),
        ];
        if let Some(map) = &self.gsm_map {
            fields.extend([map.op_name.as_str(), map.imsi.as_str(), map.msisdn.as_str()]);
        }
        if let Some(tcap) = &self.tcap {
            fields.extend([tcap.message_type.as_str(), tcap.otid.as_str(), tcap.dtid.as_str()]);
        }
        if let Some(cap) = &self.cap {
            fields.extend([cap.operation.as_str(), cap.imsi.as_str(), cap.called_number.as_str()]);
        }
        fields.iter().any(|f| f.to_lowercase().contains(needle))
    }

    /// Whether any of the packet's protocols equals `proto`, ignoring case
    pub fn has_protocol(&self, proto: &str) -> bool {
        self.protocols.iter().any(|p| p.eq_ignore_ascii_case(proto))
    }
}
