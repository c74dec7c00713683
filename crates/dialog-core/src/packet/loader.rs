//! Loading packet exports
//!
//! The input is a JSON array whose elements are either [`DecodedPacket`]
//! objects or raw tshark `-T json` packets (`{"_source": {"layers": ...}}`).
//! Both shapes may be mixed. Frames without a frame number are numbered by
//! their position in the array. Elements matching neither shape are rejected.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use super::model::DecodedPacket;
use super::tshark;
use crate::errors::{TraceError, TraceResult};

/// Top-level fields of a decoded packet; an element needs at least one
const DECODED_FIELDS: &[&str] = &[
    "frame_num",
    "time_epoch",
    "time_delta",
    "time_rel",
    "src",
    "dst",
    "protocol",
    "protocols",
    "length",
    "info",
    "tcap",
    "gsm_map",
    "cap",
];

/// Read an export from any reader
pub fn load_packets_json<R: Read>(reader: R) -> TraceResult<Vec<DecodedPacket>> {
    let root: Value = serde_json::from_reader(reader)?;
    let elements = match root {
        Value::Array(elements) => elements,
        other => {
            return Err(TraceError::unsupported_format(format!(
                "expected a JSON array of packets, found {}",
                kind_name(&other)
            )));
        }
    };

    let mut tshark_count = 0usize;
    let mut packets = Vec::with_capacity(elements.len());
    for (idx, element) in elements.into_iter().enumerate() {
        let mut packet = if tshark::is_tshark_packet(&element) {
            tshark_count += 1;
            tshark::from_tshark(idx, &element)?
        } else {
            decoded_packet(idx, element)?
        };
        if packet.frame_num == 0 {
            packet.frame_num = idx as u64 + 1;
        }
        packets.push(packet);
    }

    debug!(
        "Loaded {} packets ({} from tshark layers)",
        packets.len(),
        tshark_count
    );
    Ok(packets)
}

/// Read an export from a file
pub fn load_packets_path(path: impl AsRef<Path>) -> TraceResult<Vec<DecodedPacket>> {
    let file = File::open(path.as_ref())?;
    load_packets_json(BufReader::new(file))
}

fn decoded_packet(idx: usize, element: Value) -> TraceResult<DecodedPacket> {
    let recognised = element
        .as_object()
        .is_some_and(|fields| DECODED_FIELDS.iter().any(|name| fields.contains_key(*name)));
    if !recognised {
        return Err(TraceError::unsupported_format(format!(
            "element {} is neither a decoded packet nor a tshark packet",
            idx
        )));
    }
    Ok(serde_json::from_value(element)?)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
