use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::analysis::{
    PacketPage, PacketQuery, SearchHit, TraceStats, list_packets, search_packets, trace_stats,
};
use crate::config::CorrelationConfig;
use crate::dialog::{Dialogue, build_dialogues_with};
use crate::errors::{TraceError, TraceResult};
use crate::packet::DecodedPacket;
use crate::transaction::{Correlator, UnansweredRequest};

/// Immutable snapshot of one stored trace
pub type TraceSnapshot = Arc<[DecodedPacket]>;

#[derive(Default)]
struct StoreInner {
    /// Traces in write order; the last entry is the default
    traces: IndexMap<String, TraceSnapshot>,
}

/// Named traces shared between concurrent readers. Clones share the same traces.
#[derive(Clone)]
pub struct TraceStore {
    inner: Arc<RwLock<StoreInner>>,
    correlator: Correlator,
}

impl TraceStore {
    pub fn new() -> Self {
        Self::with_config(CorrelationConfig::default())
    }

    pub fn with_config(config: CorrelationConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner::default())),
            correlator: Correlator::with_config(config),
        }
    }

    pub fn config(&self) -> &CorrelationConfig {
        self.correlator.config()
    }

    /// Store (or replace) a trace and make it the default. Returns the packet count.
    pub async fn insert(&self, name: impl Into<String>, packets: Vec<DecodedPacket>) -> usize {
        let name = name.into();
        let count = packets.len();
        let snapshot: TraceSnapshot = packets.into();

        let mut inner = self.inner.write().await;
        if inner.traces.shift_remove(&name).is_some() {
            warn!("Replaced trace {} ({} packets)", name, count);
        } else {
            info!("Stored trace {} ({} packets)", name, count);
        }
        inner.traces.insert(name, snapshot);

        count
    }

    /// Snapshot of a trace; `None` selects the most recently written one
    pub async fn get(&self, name: Option<&str>) -> TraceResult<TraceSnapshot> {
        self.resolve(name).await.map(|(_, packets)| packets)
    }

    /// Remove a trace. The default falls back to the most recently written remaining one.
    pub async fn remove(&self, name: &str) -> TraceResult<()> {
        let mut inner = self.inner.write().await;
        if inner.traces.shift_remove(name).is_none() {
            return Err(TraceError::trace_not_found(name));
        }
        match inner.traces.last() {
            Some((fallback, _)) => info!("Removed trace {}, default is now {}", name, fallback),
            None => info!("Removed trace {}, store is empty", name),
        }
        Ok(())
    }

    /// The name a lookup resolved to, with its snapshot
    async fn resolve(&self, name: Option<&str>) -> TraceResult<(String, TraceSnapshot)> {
        let inner = self.inner.read().await;
        let found = match name {
            Some(name) => inner
                .traces
                .get_key_value(name)
                .ok_or_else(|| TraceError::trace_not_found(name))?,
            None => inner
                .traces
                .last()
                .ok_or_else(|| TraceError::trace_not_found("no default trace"))?,
        };
        Ok((found.0.clone(), found.1.clone()))
    }

    /// Stored trace names, sorted
    pub async fn names(&self) -> Vec<String> {
        let inner = self.inner.read().await;
        let mut names: Vec<String> = inner.traces.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn dialogues(&self, name: Option<&str>) -> TraceResult<Vec<Dialogue>> {
        let packets = self.get(name).await?;
        Ok(build_dialogues_with(&packets, self.config().dtid_policy))
    }

    pub async fn unanswered(&self, name: Option<&str>) -> TraceResult<Vec<UnansweredRequest>> {
        let packets = self.get(name).await?;
        let report = self.correlator.find_unanswered(&packets);
        debug!("{} unanswered requests in {} packets", report.len(), packets.len());
        Ok(report)
    }

    pub async fn stats(&self, name: Option<&str>) -> TraceResult<TraceStats> {
        let packets = self.get(name).await?;
        Ok(trace_stats(&packets))
    }

    /// Free-text search; an empty query is rejected
    pub async fn search(&self, name: Option<&str>, query: &str) -> TraceResult<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Err(TraceError::invalid_query("search query must not be empty"));
        }
        let packets = self.get(name).await?;
        Ok(search_packets(&packets, query))
    }

    pub async fn packets(
        &self,
        name: Option<&str>,
        query: &PacketQuery,
    ) -> TraceResult<PacketPage> {
        let packets = self.get(name).await?;
        Ok(list_packets(&packets, query))
    }

    /// Full detail of one frame
    pub async fn packet(&self, name: Option<&str>, frame: u64) -> TraceResult<DecodedPacket> {
        let (trace, packets) = self.resolve(name).await?;
        packets
            .iter()
            .find(|p| p.frame_num == frame)
            .cloned()
            .ok_or(TraceError::PacketNotFound { trace, frame })
    }
}

impl Default for TraceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{ComponentKind, MessageKind, TcapComponent, TcapInfo};

    fn invoke(frame: u64, otid: &str) -> DecodedPacket {
        DecodedPacket {
            frame_num: frame,
            tcap: Some(TcapInfo {
                message_type: MessageKind::Begin,
                otid: otid.into(),
                components: vec![TcapComponent {
                    kind: ComponentKind::Invoke,
                    invoke_id: "1".into(),
                    op_code: "2".into(),
                }],
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn insert_reports_packet_count() {
        let store = TraceStore::new();
        let count = tokio_test::block_on(store.insert("a", vec![invoke(1, "T1"), invoke(2, "T2")]));
        assert_eq!(count, 2);
        assert_eq!(tokio_test::block_on(store.names()), vec!["a".to_string()]);
    }

    #[test]
    fn clones_share_traces() {
        let store = TraceStore::new();
        let clone = store.clone();
        tokio_test::block_on(store.insert("a", vec![invoke(1, "T1")]));

        let report = tokio_test::block_on(clone.unanswered(None)).unwrap();
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn store_config_drives_correlation() {
        let store = TraceStore::with_config(CorrelationConfig::default().with_orphan_errors());
        assert!(store.config().report_orphan_errors);
    }
}
