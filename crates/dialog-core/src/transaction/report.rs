//! Report items produced by the correlator

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::packet::DecodedPacket;

/// How an Invoke ended, as far as the trace shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// No Return/Reject was seen before the end of the trace
    NoResponse,
    /// Answered with ReturnError or Reject
    ErrorResponse,
    /// A ReturnError/Reject that matched no pending Invoke
    OrphanError,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::NoResponse => "no_response",
            RequestStatus::ErrorResponse => "error_response",
            RequestStatus::OrphanError => "orphan_error",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An Invoke that was not answered, or was answered with an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnansweredRequest {
    pub frame_num: u64,
    pub time_rel: String,
    pub src: String,
    pub dst: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub imsi: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub msisdn: String,
    pub operation: String,
    pub invoke_id: String,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Frame of the ReturnError/Reject that resolved the Invoke
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_frame: Option<u64>,
    /// OTID of the Invoke's packet; the enrichment lookup key
    #[serde(skip)]
    pub otid: String,
}

impl UnansweredRequest {
    /// A fresh pending entry for an Invoke seen on `packet`
    pub(crate) fn pending(packet: &DecodedPacket, invoke_id: &str, op_code: &str) -> Self {
        let subscriber = packet.subscriber();
        let operation = match packet.operation() {
            "" => op_code,
            op => op,
        };

        Self {
            frame_num: packet.frame_num,
            time_rel: packet.time_rel.clone(),
            src: packet.src.clone(),
            dst: packet.dst.clone(),
            imsi: subscriber.imsi,
            msisdn: subscriber.msisdn,
            operation: operation.to_string(),
            invoke_id: invoke_id.to_string(),
            status: RequestStatus::NoResponse,
            error_code: None,
            response_frame: None,
            otid: packet.otid().to_string(),
        }
    }

    /// Record the failing component that closed this request
    pub(crate) fn resolve_with_error(&mut self, error_code: Option<String>, response_frame: u64) {
        self.status = RequestStatus::ErrorResponse;
        self.error_code = error_code;
        self.response_frame = Some(response_frame);
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, RequestStatus::ErrorResponse | RequestStatus::OrphanError)
    }
}
