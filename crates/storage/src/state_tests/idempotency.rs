// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Every handler must tolerate replays of events already applied.

use super::*;

fn all_events() -> Vec<Event> {
    vec![
        user_created_event(1, "alice", false),
        Event::UserSettingsUpdated { id: UserId(1), notifications_email: "a@x.org".to_string() },
        workspace_created_event(1, "w1", 1),
        Event::UserWorkspaceSelected { id: UserId(1), workspace: WorkspaceId(1) },
        Event::WorkspaceArchiveSet { id: WorkspaceId(1), archived: true },
        Event::WorkspaceNotificationsSet { id: WorkspaceId(1), enabled: true },
        backend_created_event(1, "tpp", "token"),
        Event::BackendTokenRotated { id: BackendId(1), auth_token: "rotated".to_string() },
        Event::BackendSeen { id: BackendId(1), at_ms: 77, url: Some("http://tpp".to_string()) },
        job_request_created_event(1, 1, "tpp", &["a", "b"]),
        Event::JobRequestCancelled { id: JobRequestId(1), actions: vec!["a".to_string()] },
        job_created_event(1, 1, "a", JobStatus::Pending),
        job_updated_event(1, JobStatus::Running, 80),
        job_created_event(2, 1, "b", JobStatus::Pending),
        job_zombified_event(2, 90),
        Event::OrgCreated {
            id: OrgId(1),
            name: "Org".to_string(),
            slug: "org".to_string(),
            created_by: UserId(1),
            created_at_ms: 1,
        },
        Event::MembershipSet {
            project: ProjectId(1),
            user: UserId(1),
            roles: vec![ProjectRole::ProjectDeveloper],
        },
    ]
}

#[test]
fn applying_each_event_twice_matches_once() {
    let mut once = MaterializedState::default();
    let mut twice = MaterializedState::default();
    for event in all_events() {
        once.apply_event(&event);
        twice.apply_event(&event);
        twice.apply_event(&event);
    }
    assert_eq!(once, twice);
}

#[test]
fn replaying_the_whole_log_changes_nothing() {
    let mut state = MaterializedState::default();
    for event in all_events() {
        state.apply_event(&event);
    }
    let before = state.clone();
    for event in all_events() {
        state.apply_event(&event);
    }
    assert_eq!(state, before);
}
