// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::*;

#[test]
fn event_serializes_with_type_tag() {
    let event = Event::JobRequestCancelled {
        id: JobRequestId(7),
        actions: vec!["test1".to_string()],
    };
    let json: serde_json::Value = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "job_request:cancelled");
    assert_eq!(json["id"], 7);
    assert_eq!(json["actions"][0], "test1");
}

#[test]
fn name_matches_serde_tag() {
    let events = vec![
        user_created_event(1, "alice", false),
        workspace_created_event(1, "w1", 1),
        backend_created_event(1, "tpp", "token"),
        job_request_created_event(1, 1, "tpp", &["a"]),
        job_created_event(1, 1, "a", JobStatus::Pending),
        job_zombified_event(1, 5),
    ];
    for event in events {
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.name());
    }
}

#[test]
fn job_created_defaults_status_when_absent() {
    let json = r#"{"type":"job:created","id":4,"identifier":"x","job_request":2,
        "action":"a","created_at_ms":9}"#;
    let event: Event = serde_json::from_str(json).unwrap();
    match event {
        Event::JobCreated { status, status_message, .. } => {
            assert_eq!(status, JobStatus::Unscheduled);
            assert!(status_message.is_empty());
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn unknown_event_type_fails_to_parse() {
    assert!(serde_json::from_str::<Event>(r#"{"type":"nope"}"#).is_err());
}
