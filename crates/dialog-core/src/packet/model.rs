//! Decoded packet model
//!
//! The JSON shape follows the decoded export: one object per frame with the
//! common frame fields and optional `tcap`, `gsm_map` and `cap` records.
//! Unknown fields (raw dissector layers, for instance) are ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One already-dissected frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodedPacket {
    /// Capture sequence number (1-based)
    pub frame_num: u64,
    pub time_epoch: String,
    pub time_delta: String,
    /// Seconds since the first frame, as rendered by the decoder
    pub time_rel: String,
    pub src: String,
    pub dst: String,
    /// Highest-level protocol recognised in the frame
    pub protocol: String,
    /// Every protocol present, outermost first
    pub protocols: Vec<String>,
    pub length: u64,
    pub info: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tcap: Option<TcapInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gsm_map: Option<GsmMapInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap: Option<CapInfo>,
}

/// TCAP dialogue portion of a frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcapInfo {
    pub message_type: MessageKind,
    /// Originating transaction id
    pub otid: String,
    /// Destination transaction id, empty until the responder assigns one
    pub dtid: String,
    pub app_context: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<TcapComponent>,
}

/// One component of a TCAP message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TcapComponent {
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub invoke_id: String,
    /// Operation code for Invoke/ReturnResult, error code for ReturnError
    pub op_code: String,
}

/// GSM MAP application layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GsmMapInfo {
    pub op_code: String,
    pub op_name: String,
    pub invoke_id: String,
    pub app_context: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub imsi: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub msisdn: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub called_gt: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub calling_gt: String,
    pub component: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error_code: String,
}

/// CAMEL Application Part layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapInfo {
    pub operation: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub imsi: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub called_number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub calling_number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub event_type: String,
}

/// TCAP message type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    Begin,
    Continue,
    End,
    Abort,
    Unidirectional,
    /// Anything the decoder reported that is not one of the above; empty when absent
    Other(String),
}

impl Default for MessageKind {
    fn default() -> Self {
        MessageKind::Other(String::new())
    }
}

impl MessageKind {
    /// Normalise a decoder value, accepting both the ITU tag numbers and names
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "1" | "unidirectional" | "uni" => MessageKind::Unidirectional,
            "2" | "begin" => MessageKind::Begin,
            "4" | "end" => MessageKind::End,
            "5" | "continue" => MessageKind::Continue,
            "7" | "abort" => MessageKind::Abort,
            _ => MessageKind::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MessageKind::Begin => "Begin",
            MessageKind::Continue => "Continue",
            MessageKind::End => "End",
            MessageKind::Abort => "Abort",
            MessageKind::Unidirectional => "Unidirectional",
            MessageKind::Other(raw) => raw,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl From<String> for MessageKind {
    fn from(raw: String) -> Self {
        MessageKind::parse(&raw)
    }
}

impl From<MessageKind> for String {
    fn from(kind: MessageKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome kind of a single remote operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKind {
    Invoke,
    ReturnResult,
    ReturnError,
    Reject,
    Other(String),
}

impl Default for ComponentKind {
    fn default() -> Self {
        ComponentKind::Other(String::new())
    }
}

impl ComponentKind {
    /// Classify a decoder value.
    ///
    /// Decoders disagree on spelling (`invoke`, `returnResultLast`,
    /// `returnResultNotLast`, `returnError`, numeric tags), so classification
    /// is by keyword rather than exact match.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        match lower.as_str() {
            "1" => return ComponentKind::Invoke,
            "2" => return ComponentKind::ReturnResult,
            "3" => return ComponentKind::ReturnError,
            "4" => return ComponentKind::Reject,
            _ => {}
        }

        if lower.contains("invoke") {
            ComponentKind::Invoke
        } else if lower.contains("return") && !lower.contains("error") {
            ComponentKind::ReturnResult
        } else if lower.contains("reject") {
            ComponentKind::Reject
        } else if lower.contains("error") {
            ComponentKind::ReturnError
        } else {
            ComponentKind::Other(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ComponentKind::Invoke => "Invoke",
            ComponentKind::ReturnResult => "ReturnResult",
            ComponentKind::ReturnError => "ReturnError",
            ComponentKind::Reject => "Reject",
            ComponentKind::Other(raw) => raw,
        }
    }

    /// ReturnError and Reject both close an Invoke unsuccessfully
    pub fn is_failure(&self) -> bool {
        matches!(self, ComponentKind::ReturnError | ComponentKind::Reject)
    }
}

impl From<String> for ComponentKind {
    fn from(raw: String) -> Self {
        ComponentKind::parse(&raw)
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_kind_accepts_decoder_spellings() {
        assert_eq!(ComponentKind::parse("invoke"), ComponentKind::Invoke);
        assert_eq!(ComponentKind::parse("returnResultLast"), ComponentKind::ReturnResult);
        assert_eq!(ComponentKind::parse("returnResultNotLast"), ComponentKind::ReturnResult);
        assert_eq!(ComponentKind::parse("returnError"), ComponentKind::ReturnError);
        assert_eq!(ComponentKind::parse("reject"), ComponentKind::Reject);
        assert_eq!(ComponentKind::parse("3"), ComponentKind::ReturnError);
        assert_eq!(ComponentKind::parse("linkedId"), ComponentKind::Other("linkedId".into()));
    }

    #[test]
    fn only_errors_and_rejects_are_failures() {
        assert!(ComponentKind::ReturnError.is_failure());
        assert!(ComponentKind::Reject.is_failure());
        assert!(!ComponentKind::Invoke.is_failure());
        assert!(!ComponentKind::ReturnResult.is_failure());
        assert!(!ComponentKind::parse("linkedId").is_failure());
    }

    #[test]
    fn message_kind_accepts_tags_and_names() {
        assert_eq!(MessageKind::parse("2"), MessageKind::Begin);
        assert_eq!(MessageKind::parse("Continue"), MessageKind::Continue);
        assert_eq!(MessageKind::parse("end"), MessageKind::End);
        assert_eq!(MessageKind::parse("1"), MessageKind::Unidirectional);
        assert!(MessageKind::default().is_empty());
    }

    #[test]
    fn deserializes_export_shape() {
        let json = r#"{
            "frame_num": 3,
            "time_rel": "0.25",
            "src": "10.0.0.1",
            "dst": "10.0.0.2",
            "protocols": ["eth", "sctp", "m3ua", "sccp", "tcap", "gsm_map"],
            "layers": {"tcap": {"name": "tcap", "fields": []}},
            "tcap": {
                "message_type": "begin",
                "otid": "0a1b",
                "components": [{"type": "invoke", "invoke_id": "1", "op_code": "2"}]
            },
            "gsm_map": {"op_code": "2", "op_name": "UpdateLocation", "imsi": "001010123456789"}
        }"#;

        let packet: DecodedPacket = serde_json::from_str(json).unwrap();
        let tcap = packet.tcap.as_ref().unwrap();
        assert_eq!(packet.frame_num, 3);
        assert_eq!(tcap.message_type, MessageKind::Begin);
        assert_eq!(tcap.dtid, "");
        assert_eq!(tcap.components[0].kind, ComponentKind::Invoke);
        assert_eq!(packet.gsm_map.as_ref().unwrap().imsi, "001010123456789");
        assert!(packet.cap.is_none());
    }

    #[test]
    fn serializes_canonical_kind_names() {
        let component = TcapComponent {
            kind: ComponentKind::parse("returnResultLast"),
            invoke_id: "4".into(),
            op_code: String::new(),
        };
        let value = serde_json::to_value(&component).unwrap();
        assert_eq!(value["type"], "ReturnResult");
    }
}
