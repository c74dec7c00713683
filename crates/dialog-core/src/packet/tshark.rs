//! tshark `-T json` ingestion
//!
//! Each element of a tshark export looks like
//! `{"_source": {"layers": {"<proto>": {"<field>": <value>, ...}}}}`. Field
//! trees nest (`*_tree`, `*_element` keys), so every lookup searches its layer
//! depth-first and takes the first non-empty match. Operation and error codes
//! are kept as the numeric values tshark prints; no name tables are applied.

use serde_json::{Map, Value};
use tracing::trace;

use super::model::{
    CapInfo, ComponentKind, DecodedPacket, GsmMapInfo, MessageKind, TcapComponent, TcapInfo,
};
use crate::errors::{TraceError, TraceResult};

/// Layers checked, in order, for a packet's highest-level protocol
const PROTOCOL_PRIORITY: &[&str] = &[
    "gsm_map", "cap", "camel", "tcap", "sccp", "mtp3", "m3ua", "sctp", "tcp", "udp", "ip",
];

const TCAP_MESSAGE_ELEMENTS: &[(&str, MessageKind)] = &[
    ("tcap.begin_element", MessageKind::Begin),
    ("tcap.continue_element", MessageKind::Continue),
    ("tcap.end_element", MessageKind::End),
    ("tcap.abort_element", MessageKind::Abort),
    ("tcap.unidirectional_element", MessageKind::Unidirectional),
];

/// Whether `element` is a tshark packet rather than a decoded one
pub fn is_tshark_packet(element: &Value) -> bool {
    element.get("_source").is_some()
}

/// Convert one tshark element. `index` is its 0-based position in the export
/// and numbers the frame when `frame.number` is absent.
pub fn from_tshark(index: usize, element: &Value) -> TraceResult<DecodedPacket> {
    let layers = element
        .pointer("/_source/layers")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            TraceError::unsupported_format(format!(
                "element {}: `_source.layers` is not an object",
                index
            ))
        })?;

    let mut packet = DecodedPacket {
        frame_num: index as u64 + 1,
        ..Default::default()
    };

    if let Some(frame) = layer(layers, "frame") {
        if let Some(number) = find(frame, "frame.number").and_then(|n| n.trim().parse().ok()) {
            packet.frame_num = number;
        }
        packet.time_epoch = first(frame, &["frame.time_epoch"]);
        packet.time_delta = first(frame, &["frame.time_delta"]);
        packet.time_rel = first(frame, &["frame.time_relative"]);
        packet.length = find(frame, "frame.len")
            .and_then(|n| n.trim().parse().ok())
            .unwrap_or_default();
        packet.info = first(frame, &["frame.protocols"]);
        packet.protocols = packet
            .info
            .split(':')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
    }
    if packet.protocols.is_empty() {
        packet.protocols = layers.keys().cloned().collect();
    }

    for (name, src, dst) in [("ip", "ip.src", "ip.dst"), ("ipv6", "ipv6.src", "ipv6.dst")] {
        if let Some(ip) = layer(layers, name) {
            if packet.src.is_empty() {
                packet.src = first(ip, &[src]);
            }
            if packet.dst.is_empty() {
                packet.dst = first(ip, &[dst]);
            }
        }
    }

    packet.protocol = PROTOCOL_PRIORITY
        .iter()
        .find(|proto| layers.contains_key(**proto))
        .copied()
        .unwrap_or("unknown")
        .to_string();

    packet.gsm_map = layer(layers, "gsm_map").map(|map| gsm_map_info(map, layer(layers, "sccp")));
    let cap_layer = layer(layers, "cap").or_else(|| layer(layers, "camel"));
    packet.cap = cap_layer.map(cap_info);
    packet.tcap = layer(layers, "tcap").map(|tcap| {
        let mut info = tcap_info(tcap);
        if info.components.is_empty() {
            info.components = application_components(
                layer(layers, "gsm_map").or(cap_layer),
                packet.gsm_map.as_ref(),
            );
        }
        info
    });

    trace!(
        frame = packet.frame_num,
        protocol = %packet.protocol,
        otid = packet.otid(),
        dtid = packet.dtid(),
        components = packet.components().len(),
        "mapped tshark packet"
    );
    Ok(packet)
}

fn tcap_info(tcap: &Value) -> TcapInfo {
    let explicit = first(tcap, &["tcap.MessageType", "tcap.message_type", "MessageType"]);
    let message_type = if explicit.is_empty() {
        TCAP_MESSAGE_ELEMENTS
            .iter()
            .find(|(key, _)| has_key(tcap, key))
            .map(|(_, kind)| kind.clone())
            .unwrap_or_default()
    } else {
        MessageKind::parse(&explicit)
    };

    TcapInfo {
        message_type,
        otid: first(tcap, &["tcap.otid", "otid", "tcap.source_transaction_id"]),
        dtid: first(tcap, &["tcap.dtid", "dtid", "tcap.destination_transaction_id"]),
        app_context: first(
            tcap,
            &["tcap.oid", "tcap.application_context", "application_context_name"],
        ),
        components: collect_components(tcap),
    }
}

fn gsm_map_info(map: &Value, sccp: Option<&Value>) -> GsmMapInfo {
    let component = first(map, &["gsm_map.component_type", "gsm_map.comp_type"]);
    let (called_gt, calling_gt) = sccp.map(global_titles).unwrap_or_default();

    GsmMapInfo {
        op_code: first(
            map,
            &["gsm_map.opr_code", "gsm_map.localValue", "gsm_map.opCode", "gsm_map.operationCode"],
        ),
        op_name: String::new(),
        invoke_id: first(map, &["gsm_map.invokeID", "gsm_map.invoke_id"]),
        app_context: String::new(),
        imsi: first(map, &["gsm_map.imsi", "e212.imsi", "gsm_map.lmsi"]),
        msisdn: first(
            map,
            &[
                "gsm_map.msisdn_digits",
                "gsm_map.msisdn",
                "gsm_map.isdn_addressString.address",
                "e164.msisdn",
            ],
        ),
        called_gt,
        calling_gt,
        component: if component.is_empty() {
            component
        } else {
            ComponentKind::parse(&component).as_str().to_string()
        },
        error_code: first(map, &["gsm_map.error_Code", "gsm_map.errorCode"]),
    }
}

fn cap_info(cap: &Value) -> CapInfo {
    CapInfo {
        operation: first(cap, &["cap.opcode", "cap.op_code", "cap.localValue", "camel.localValue"]),
        service_key: first(cap, &["cap.serviceKey", "cap.service_key", "camel.serviceKey"]),
        imsi: first(cap, &["cap.imsi", "e212.imsi"]),
        called_number: first(
            cap,
            &[
                "cap.calledPartyNumber",
                "cap.called_party_number",
                "cap.destinationSubscriberNumber",
            ],
        ),
        calling_number: first(cap, &["cap.callingPartyNumber", "cap.calling_party_number"]),
        event_type: first(cap, &["cap.eventTypeBCSM", "cap.event_type", "cap.eventTypeGPRS"]),
    }
}

/// Called and calling global-title digits from the SCCP layer
fn global_titles(sccp: &Value) -> (String, String) {
    let mut called = String::new();
    let mut calling = String::new();
    walk(sccp, &mut |key, value| {
        let is_gt = key.contains("gt_") || key.contains("digits");
        if !is_gt {
            return;
        }
        if key.contains("called") && called.is_empty() {
            called = scalar(value).unwrap_or_default();
        } else if key.contains("calling") && calling.is_empty() {
            calling = scalar(value).unwrap_or_default();
        }
    });
    (called, calling)
}

/// Components carried by the application layer when TCAP shows none.
/// Falls back to the flat MAP component fields as a single component.
fn application_components(app: Option<&Value>, map: Option<&GsmMapInfo>) -> Vec<TcapComponent> {
    let components = app.map(collect_components).unwrap_or_default();
    if !components.is_empty() {
        return components;
    }

    match map {
        Some(map) if !map.component.is_empty() && !map.invoke_id.is_empty() => {
            let kind = ComponentKind::parse(&map.component);
            let op_code = if kind == ComponentKind::ReturnError && !map.error_code.is_empty() {
                map.error_code.clone()
            } else {
                map.op_code.clone()
            };
            vec![TcapComponent {
                kind,
                invoke_id: map.invoke_id.clone(),
                op_code,
            }]
        }
        _ => Vec::new(),
    }
}

/// Innermost objects under `*component*` keys, one component each
fn collect_components(layer: &Value) -> Vec<TcapComponent> {
    let mut components = Vec::new();
    collect_into(layer, &mut components);
    components
}

fn collect_into(node: &Value, out: &mut Vec<TcapComponent>) {
    match node {
        Value::Object(fields) => {
            for (key, child) in fields {
                if !key.to_ascii_lowercase().contains("component") {
                    collect_into(child, out);
                    continue;
                }
                let candidates: Vec<&Value> = match child {
                    Value::Array(items) => items.iter().collect(),
                    Value::Object(_) => vec![child],
                    _ => continue,
                };
                for candidate in candidates {
                    let before = out.len();
                    collect_into(candidate, out);
                    if out.len() == before {
                        out.extend(component_from(candidate));
                    }
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_into(item, out)),
        _ => {}
    }
}

fn component_from(node: &Value) -> Option<TcapComponent> {
    let mut component = TcapComponent::default();
    let mut declared: Option<ComponentKind> = None;
    let mut element: Option<ComponentKind> = None;

    walk(node, &mut |key, value| {
        let lower = key.to_ascii_lowercase();
        if lower.contains("invoke_id") || lower.contains("invokeid") {
            if component.invoke_id.is_empty() {
                component.invoke_id = scalar(value).unwrap_or_default();
            }
        } else if lower.contains("opcode")
            || lower.contains("op_code")
            || lower.contains("errorcode")
            || lower.contains("localvalue")
        {
            if component.op_code.is_empty() {
                component.op_code = scalar(value).unwrap_or_default();
            }
        } else if lower.contains("componenttype") || lower.contains("component_type") {
            if declared.is_none() {
                declared = scalar(value).map(|raw| ComponentKind::parse(&raw));
            }
        } else if lower.ends_with("_element") && element.is_none() {
            let kind = ComponentKind::parse(key);
            if !matches!(kind, ComponentKind::Other(_)) {
                element = Some(kind);
            }
        }
    });

    component.kind = declared.or(element).unwrap_or_default();
    let empty = component.invoke_id.is_empty()
        && component.op_code.is_empty()
        && matches!(component.kind, ComponentKind::Other(_));
    (!empty).then_some(component)
}

/// A layer by name; repeated layers come as arrays, the first one wins
fn layer<'a>(layers: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    match layers.get(name)? {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
}

/// First non-empty value among `names`, or an empty string
fn first(layer: &Value, names: &[&str]) -> String {
    names
        .iter()
        .find_map(|name| find(layer, name))
        .unwrap_or_default()
}

/// Depth-first search for a field by exact name
fn find(node: &Value, name: &str) -> Option<String> {
    match node {
        Value::Object(fields) => {
            if let Some(value) = fields.get(name).and_then(scalar) {
                return Some(value);
            }
            fields.values().find_map(|child| find(child, name))
        }
        Value::Array(items) => items.iter().find_map(|item| find(item, name)),
        _ => None,
    }
}

fn has_key(node: &Value, name: &str) -> bool {
    match node {
        Value::Object(fields) => {
            fields.contains_key(name) || fields.values().any(|child| has_key(child, name))
        }
        Value::Array(items) => items.iter().any(|item| has_key(item, name)),
        _ => false,
    }
}

/// Visit every `(key, value)` pair below `node`, parents before children
fn walk<'a>(node: &'a Value, visit: &mut impl FnMut(&'a str, &'a Value)) {
    match node {
        Value::Object(fields) => {
            for (key, value) in fields {
                visit(key, value);
                walk(value, visit);
            }
        }
        Value::Array(items) => items.iter().for_each(|item| walk(item, visit)),
        _ => {}
    }
}

/// A field's display value. Repeated fields come as arrays; the first wins.
fn scalar(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => return items.iter().find_map(scalar),
        Value::Object(_) | Value::Null => return None,
    };
    (!text.is_empty()).then_some(text)
}
