//! Shared trace store behaviour under concurrent access

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;

use common::{begin, end, plain};
use sigflow_dialog_core::{
    ComponentKind, DecodedPacket, PacketQuery, RequestStatus, TraceError, TraceStore,
};

fn unanswered_trace() -> Vec<DecodedPacket> {
    vec![
        plain(1),
        begin(2)
            .otid("T1")
            .component(ComponentKind::Invoke, "1", "2")
            .map_op("updateLocation")
            .imsi("208011234567890")
            .build(),
    ]
}

fn answered_trace() -> Vec<DecodedPacket> {
    vec![
        begin(1).otid("T1").component(ComponentKind::Invoke, "1", "2").build(),
        end(2).dtid("T1").component(ComponentKind::ReturnResult, "1", "2").build(),
    ]
}

#[tokio::test]
async fn empty_store_reports_not_found() {
    let store = TraceStore::new();

    let err = store.unanswered(None).await.unwrap_err();
    assert!(err.is_not_found());

    let err = store.dialogues(Some("missing")).await.unwrap_err();
    assert!(matches!(err, TraceError::TraceNotFound(ref name) if name == "missing"));
}

#[tokio::test]
async fn latest_trace_is_the_default() {
    let store = TraceStore::new();
    assert_eq!(store.insert("first", unanswered_trace()).await, 2);
    store.insert("second", answered_trace()).await;

    assert!(store.unanswered(None).await.unwrap().is_empty());
    assert_eq!(store.unanswered(Some("first")).await.unwrap().len(), 1);
    assert_eq!(store.names().await, vec!["first".to_string(), "second".to_string()]);
}

#[tokio::test]
async fn replacement_swaps_the_whole_trace() {
    let store = TraceStore::new();
    store.insert("capture", unanswered_trace()).await;

    let before = store.get(Some("capture")).await.unwrap();
    store.insert("capture", answered_trace()).await;

    // A snapshot taken before the replacement stays intact
    assert_eq!(before.len(), 2);
    assert_eq!(before[0].frame_num, 1);
    assert!(store.unanswered(Some("capture")).await.unwrap().is_empty());
    assert_eq!(store.names().await.len(), 1);
}

#[tokio::test]
async fn removing_the_latest_trace_clears_the_default() {
    let store = TraceStore::new();
    store.insert("a", answered_trace()).await;
    store.remove("a").await.unwrap();

    let err = store.get(None).await.unwrap_err();
    assert!(matches!(err, TraceError::TraceNotFound(ref msg) if msg == "no default trace"));
    assert!(store.remove("a").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn removing_the_latest_trace_falls_back_to_the_previous_one() {
    let store = TraceStore::new();
    store.insert("a", unanswered_trace()).await;
    store.insert("b", answered_trace()).await;
    store.insert("c", answered_trace()).await;

    store.remove("c").await.unwrap();
    assert!(store.unanswered(None).await.unwrap().is_empty());

    store.remove("b").await.unwrap();
    assert_eq!(store.unanswered(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn rewriting_a_trace_makes_it_the_default_again() {
    let store = TraceStore::new();
    store.insert("a", unanswered_trace()).await;
    store.insert("b", answered_trace()).await;
    store.insert("a", unanswered_trace()).await;

    store.remove("b").await.unwrap();
    assert_eq!(store.unanswered(None).await.unwrap().len(), 1);
    assert_eq!(store.names().await, vec!["a".to_string()]);
}

#[tokio::test]
async fn missing_packet_names_the_resolved_trace() {
    let store = TraceStore::new();
    store.insert("first", unanswered_trace()).await;
    store.insert("second", answered_trace()).await;

    let err = store.packet(None, 99).await.unwrap_err();
    assert!(
        matches!(err, TraceError::PacketNotFound { ref trace, frame: 99 } if trace == "second")
    );

    let err = store.packet(Some("first"), 42).await.unwrap_err();
    assert_eq!(err.to_string(), "Packet 42 not found in trace first");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_passes_see_consistent_reports() {
    let store = Arc::new(TraceStore::new());
    store.insert("capture", unanswered_trace()).await;

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            if i % 4 == 0 {
                let trace = if i % 8 == 0 { answered_trace() } else { unanswered_trace() };
                store.insert("capture", trace).await;
                None
            } else {
                Some(store.unanswered(Some("capture")).await.unwrap())
            }
        }));
    }

    for handle in handles {
        if let Some(report) = handle.await.unwrap() {
            // Either the answered trace (empty) or the unanswered one, never a mix
            match report.as_slice() {
                [] => {}
                [item] => {
                    assert_eq!(item.status, RequestStatus::NoResponse);
                    assert_eq!(item.imsi, "208011234567890");
                }
                other => panic!("unexpected report {:?}", other),
            }
        }
    }
}

#[tokio::test]
async fn search_rejects_empty_query() {
    let store = TraceStore::new();
    store.insert("capture", unanswered_trace()).await;

    let err = store.search(None, "  ").await.unwrap_err();
    assert!(matches!(err, TraceError::InvalidQuery(_)));

    let hits = store.search(None, "UPDATELOC").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].frame_num, 2);
}

#[tokio::test]
async fn packet_detail_and_listing() {
    let store = TraceStore::new();
    store.insert("capture", unanswered_trace()).await;

    let packet = store.packet(None, 2).await.unwrap();
    assert_eq!(packet.otid(), "T1");

    let err = store.packet(Some("capture"), 99).await.unwrap_err();
    assert!(matches!(err, TraceError::PacketNotFound { frame: 99, .. }));

    let page = store
        .packets(None, &PacketQuery::default().with_proto("gsm_map"))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.packets[0].frame_num, 2);
    assert_eq!(page.packets[0].map_op.as_deref(), Some("updateLocation"));

    let stats = store.stats(None).await.unwrap();
    assert_eq!(stats.total_packets, 2);
}
