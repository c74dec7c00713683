//! Pending-Invoke Correlator
//!
//! Walks a packet sequence once, keeping the Invokes that still wait for an
//! answer. All state lives in a [`CorrelationPass`] created per call, so a
//! [`Correlator`] can be shared freely between threads.
//!
//! Per component:
//!
//! | component           | effect                                                   |
//! |---------------------|----------------------------------------------------------|
//! | Invoke              | insert/overwrite pending `OTID:id`                        |
//! | ReturnResult        | drop pending `OTID:id` and `DTID:id`                      |
//! | ReturnError, Reject | move first pending hit (probe order) to resolved-with-error |
//!
//! At end of stream everything still pending is `no_response`.

use indexmap::IndexMap;
use sigflow_infra_common::LogContext;
use tracing::{Level, debug, trace};

use super::enrichment::IdentityIndex;
use super::key::InvokeKey;
use super::report::{RequestStatus, UnansweredRequest};
use crate::config::CorrelationConfig;
use crate::packet::{ComponentKind, DecodedPacket, TcapComponent};

/// Stateless entry point; each call runs an independent pass
#[derive(Debug, Clone, Default)]
pub struct Correlator {
    config: CorrelationConfig,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CorrelationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    /// Report every Invoke that was unanswered or answered with an error.
    ///
    /// Order: `no_response` items by first Invoke, then `error_response` items
    /// by resolution, then orphan errors when enabled.
    pub fn find_unanswered(&self, packets: &[DecodedPacket]) -> Vec<UnansweredRequest> {
        let ctx = LogContext::with_operation("correlator", "find_unanswered")
            .with_field("packets", packets.len().to_string());
        let span = ctx.span(Level::DEBUG);
        let _guard = span.enter();

        let mut pass = CorrelationPass::new(self.config);
        for packet in packets {
            pass.observe(packet);
        }
        pass.finish()
    }
}

/// Report unanswered Invokes with the default policies
pub fn find_unanswered(packets: &[DecodedPacket]) -> Vec<UnansweredRequest> {
    Correlator::new().find_unanswered(packets)
}

/// Correlation state for one pass over one packet sequence
#[derive(Debug)]
pub struct CorrelationPass {
    config: CorrelationConfig,
    pending: IndexMap<InvokeKey, UnansweredRequest>,
    resolved: IndexMap<InvokeKey, UnansweredRequest>,
    orphans: Vec<UnansweredRequest>,
    identities: IdentityIndex,
}

impl CorrelationPass {
    pub fn new(config: CorrelationConfig) -> Self {
        Self {
            config,
            pending: IndexMap::new(),
            resolved: IndexMap::new(),
            orphans: Vec::new(),
            identities: IdentityIndex::new(),
        }
    }

    /// Fold one packet into the pass. Packets without a TCAP layer carry no
    /// components and no transaction ids, so they are skipped.
    pub fn observe(&mut self, packet: &DecodedPacket) {
        if packet.tcap.is_none() {
            return;
        }

        let subscriber = packet.subscriber();
        if !subscriber.is_empty() {
            self.identities.record(packet.otid(), packet.dtid(), &subscriber);
        }

        for component in packet.components() {
            match &component.kind {
                ComponentKind::Invoke => self.on_invoke(packet, component),
                ComponentKind::ReturnResult => self.on_result(packet, component),
                kind if kind.is_failure() => self.on_error(packet, component),
                kind => {
                    trace!(frame = packet.frame_num, kind = %kind, "ignoring component");
                }
            }
        }
    }

    fn on_invoke(&mut self, packet: &DecodedPacket, component: &TcapComponent) {
        let key = InvokeKey::new(packet.otid(), &component.invoke_id);
        let request = UnansweredRequest::pending(packet, &component.invoke_id, &component.op_code);
        trace!(
            frame = packet.frame_num,
            key = %key,
            operation = %request.operation,
            "invoke pending"
        );

        if self.pending.insert(key.clone(), request).is_some() {
            debug!(frame = packet.frame_num, key = %key, "invoke id reused, replacing");
        }
    }

    fn on_result(&mut self, packet: &DecodedPacket, component: &TcapComponent) {
        for tid in [packet.otid(), packet.dtid()] {
            if tid.is_empty() {
                continue;
            }
            let key = InvokeKey::new(tid, &component.invoke_id);
            if self.pending.shift_remove(&key).is_some() {
                trace!(frame = packet.frame_num, key = %key, "invoke answered");
            }
        }
    }

    fn on_error(&mut self, packet: &DecodedPacket, component: &TcapComponent) {
        let error_code = Some(if component.op_code.is_empty() {
            packet.map_error_code()
        } else {
            component.op_code.as_str()
        })
        .filter(|code| !code.is_empty())
        .map(str::to_string);

        let probes = self
            .config
            .error_probe_order
            .probes(packet.otid(), packet.dtid());

        for tid in probes {
            if tid.is_empty() {
                continue;
            }
            let key = InvokeKey::new(tid, &component.invoke_id);
            if let Some(mut request) = self.pending.shift_remove(&key) {
                request.resolve_with_error(error_code, packet.frame_num);
                debug!(
                    frame = packet.frame_num,
                    key = %key,
                    invoke_frame = request.frame_num,
                    error_code = ?request.error_code,
                    "invoke answered with {}", component.kind
                );
                // a key resolved twice is reported at its latest resolution
                self.resolved.shift_remove(&key);
                self.resolved.insert(key, request);
                return;
            }
        }

        debug!(
            frame = packet.frame_num,
            otid = packet.otid(),
            dtid = packet.dtid(),
            invoke_id = %component.invoke_id,
            "{} matches no pending invoke", component.kind
        );
        if self.config.report_orphan_errors {
            let mut orphan = UnansweredRequest::pending(packet, &component.invoke_id, "");
            orphan.status = RequestStatus::OrphanError;
            orphan.error_code = error_code;
            orphan.response_frame = Some(packet.frame_num);
            self.orphans.push(orphan);
        }
    }

    /// Close the pass: everything pending becomes `no_response`, then identities are backfilled
    pub fn finish(self) -> Vec<UnansweredRequest> {
        let CorrelationPass {
            pending,
            resolved,
            orphans,
            identities,
            ..
        } = self;

        debug!(
            no_response = pending.len(),
            error_response = resolved.len(),
            orphan_error = orphans.len(),
            "correlation pass finished"
        );

        let mut report: Vec<UnansweredRequest> = pending
            .into_values()
            .chain(resolved.into_values())
            .chain(orphans)
            .collect();

        for request in &mut report {
            identities.backfill(request);
        }
        report
    }
}
