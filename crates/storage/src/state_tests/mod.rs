// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod idempotency;
mod jobs;
mod query;

use super::*;
pub(super) use js_core::test_support::{
    backend_created_event, job_created_event, job_request_created_event, job_updated_event,
    job_zombified_event, user_created_event, workspace_created_event,
};
use js_core::{JobStatus, ProjectRole};

/// A user, two workspaces, and one backend.
pub(super) fn seeded() -> MaterializedState {
    let mut state = MaterializedState::default();
    for event in [
        user_created_event(1, "alice", false),
        user_created_event(2, "bob", true),
        workspace_created_event(1, "w1", 1),
        workspace_created_event(2, "w2", 2),
        backend_created_event(1, "tpp", "tpp-token"),
        backend_created_event(2, "emis", "emis-token"),
    ] {
        state.apply_event(&event);
    }
    state
}

// ── Users ──────────────────────────────────────────────────────────────────

#[test]
fn apply_user_created() {
    let state = seeded();
    assert_eq!(state.users[&UserId(1)].username, "alice");
    assert!(state.users[&UserId(2)].is_superuser);
}

#[test]
fn apply_user_settings_and_selection() {
    let mut state = seeded();
    state.apply_event(&Event::UserSettingsUpdated {
        id: UserId(1),
        notifications_email: "alice@research.org".to_string(),
    });
    state.apply_event(&Event::UserWorkspaceSelected { id: UserId(1), workspace: WorkspaceId(2) });

    let user = &state.users[&UserId(1)];
    assert_eq!(user.notifications_email, "alice@research.org");
    assert_eq!(user.selected_workspace, Some(WorkspaceId(2)));
}

// ── Orgs ───────────────────────────────────────────────────────────────────

#[test]
fn apply_org_project_and_membership() {
    let mut state = seeded();
    state.apply_event(&Event::OrgCreated {
        id: OrgId(1),
        name: "Bennett".to_string(),
        slug: "bennett".to_string(),
        created_by: UserId(2),
        created_at_ms: 5,
    });
    state.apply_event(&Event::ProjectCreated {
        id: ProjectId(1),
        org: OrgId(1),
        name: "Covid".to_string(),
        slug: "covid".to_string(),
        project_lead: "Lead".to_string(),
        email: "lead@example.com".to_string(),
        created_by: UserId(2),
        created_at_ms: 6,
    });
    state.apply_event(&Event::MembershipSet {
        project: ProjectId(1),
        user: UserId(1),
        roles: vec![ProjectRole::ProjectCoordinator],
    });
    state.apply_event(&Event::MembershipSet {
        project: ProjectId(1),
        user: UserId(1),
        roles: vec![ProjectRole::ProjectDeveloper],
    });

    assert_eq!(state.projects[&ProjectId(1)].org, OrgId(1));
    assert_eq!(state.memberships.len(), 1);
    assert_eq!(state.memberships[0].roles, vec![ProjectRole::ProjectDeveloper]);
}

// ── Workspaces ─────────────────────────────────────────────────────────────

#[test]
fn apply_workspace_toggles() {
    let mut state = seeded();
    state.apply_event(&Event::WorkspaceArchiveSet { id: WorkspaceId(1), archived: true });
    state.apply_event(&Event::WorkspaceNotificationsSet { id: WorkspaceId(1), enabled: true });

    let ws = &state.workspaces[&WorkspaceId(1)];
    assert!(ws.is_archived);
    assert!(ws.should_notify);
}

// ── Backends ───────────────────────────────────────────────────────────────

#[test]
fn apply_token_rotation_replaces_token() {
    let mut state = seeded();
    state.apply_event(&Event::BackendTokenRotated {
        id: BackendId(1),
        auth_token: "fresh".to_string(),
    });

    assert!(state.backend_by_token("tpp-token").is_none());
    assert_eq!(state.backend_by_token("fresh").map(|b| b.name.as_str()), Some("tpp"));
}

#[test]
fn apply_backend_seen_keeps_latest() {
    let mut state = seeded();
    state.apply_event(&Event::BackendSeen { id: BackendId(1), at_ms: 20, url: None });
    state.apply_event(&Event::BackendSeen { id: BackendId(1), at_ms: 10, url: None });

    assert_eq!(state.stats[&BackendId(1)].api_last_seen_ms, Some(20));
}

#[test]
fn apply_backend_seen_ignores_unknown_backend() {
    let mut state = seeded();
    state.apply_event(&Event::BackendSeen { id: BackendId(9), at_ms: 20, url: None });
    assert!(state.stats.is_empty());
}

// ── Job requests ───────────────────────────────────────────────────────────

#[test]
fn apply_job_request_cancelled_appends_in_order() {
    let mut state = seeded();
    state.apply_event(&job_request_created_event(1, 1, "tpp", &["a", "b", "c"]));
    state.apply_event(&Event::JobRequestCancelled {
        id: JobRequestId(1),
        actions: vec!["b".to_string(), "a".to_string()],
    });
    state.apply_event(&Event::JobRequestCancelled {
        id: JobRequestId(1),
        actions: vec!["a".to_string(), "c".to_string()],
    });

    assert_eq!(state.job_requests[&JobRequestId(1)].cancelled_actions, vec!["b", "a", "c"]);
}

// ── Id allocation ──────────────────────────────────────────────────────────

#[test]
fn next_ids_follow_largest_key() {
    let mut state = seeded();
    assert_eq!(state.next_user_id(), UserId(3));
    assert_eq!(state.next_job_request_id(), JobRequestId(1));

    state.apply_event(&job_request_created_event(7, 1, "tpp", &["a"]));
    assert_eq!(state.next_job_request_id(), JobRequestId(8));
    assert_eq!(state.next_job_id(), JobId(1));
}

#[test]
fn state_round_trips_through_json() {
    let mut state = seeded();
    state.apply_event(&job_request_created_event(1, 1, "tpp", &["a"]));
    state.apply_event(&job_created_event(1, 1, "a", JobStatus::Running));

    let json = serde_json::to_string(&state).unwrap();
    let restored: MaterializedState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);
}
