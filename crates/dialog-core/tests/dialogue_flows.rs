//! Dialogue transcripts built from TCAP traces

mod common;

use pretty_assertions::assert_eq;

use common::{begin, continue_, end, plain};
use sigflow_dialog_core::{ComponentKind, DtidPolicy, build_dialogues, build_dialogues_with};

#[test]
fn groups_messages_by_otid_in_input_order() {
    let packets = vec![
        begin(1)
            .otid("T1")
            .component(ComponentKind::Invoke, "1", "2")
            .map_op("updateLocation")
            .build(),
        begin(2).otid("T2").build(),
        continue_(3).otid("T1").dtid("R1").map_op("insertSubscriberData").build(),
        end(4).otid("T1").dtid("R1").build(),
    ];

    let dialogues = build_dialogues(&packets);

    assert_eq!(dialogues.len(), 2);
    let t1 = &dialogues[0];
    assert_eq!(t1.otid, "T1");
    assert_eq!(t1.dtid, "R1");
    assert!(t1.is_answered());

    let frames: Vec<u64> = t1.messages.iter().map(|m| m.frame_num).collect();
    assert_eq!(frames, vec![1, 3, 4]);
    let types: Vec<&str> = t1.messages.iter().map(|m| m.tcap_type.as_str()).collect();
    assert_eq!(types, vec!["Begin", "Continue", "End"]);
    assert_eq!(t1.messages[0].map_op.as_deref(), Some("updateLocation"));
    assert_eq!(t1.messages[2].map_op, None);

    assert_eq!(dialogues[1].otid, "T2");
    assert!(!dialogues[1].is_answered());
}

#[test]
fn packets_without_otid_are_excluded() {
    let packets = vec![
        plain(1),
        end(2).dtid("T1").component(ComponentKind::ReturnResult, "1", "2").build(),
        begin(3).otid("T3").build(),
    ];

    let dialogues = build_dialogues(&packets);

    assert_eq!(dialogues.len(), 1);
    assert_eq!(dialogues[0].otid, "T3");
    assert_eq!(dialogues[0].messages.len(), 1);
}

#[test]
fn dtid_policy_selects_first_or_last_value() {
    let packets = vec![
        begin(1).otid("T1").build(),
        continue_(2).otid("T1").dtid("A").build(),
        continue_(3).otid("T1").dtid("B").build(),
        end(4).otid("T1").build(),
    ];

    assert_eq!(build_dialogues(&packets)[0].dtid, "A");
    assert_eq!(build_dialogues_with(&packets, DtidPolicy::LastSeen)[0].dtid, "B");
}

#[test]
fn transcript_serializes_without_empty_fields() {
    let packets = vec![begin(1).otid("T1").build()];

    let json = serde_json::to_value(build_dialogues(&packets)).unwrap();

    assert_eq!(json[0]["otid"], "T1");
    assert!(json[0].get("dtid").is_none());
    assert_eq!(json[0]["messages"][0]["tcap_type"], "Begin");
    assert!(json[0]["messages"][0].get("map_op").is_none());
}
