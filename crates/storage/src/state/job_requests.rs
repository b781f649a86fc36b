// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job request event handlers.

use js_core::{Event, JobRequest};

use super::MaterializedState;

pub(crate) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::JobRequestCreated {
            id,
            identifier,
            workspace,
            backend,
            created_by,
            sha,
            requested_actions,
            force_run_dependencies,
            will_notify,
            created_at_ms,
        } => {
            state.job_requests.entry(*id).or_insert_with(|| JobRequest {
                id: *id,
                identifier: identifier.clone(),
                workspace: *workspace,
                backend: backend.clone(),
                created_by: *created_by,
                sha: sha.clone(),
                requested_actions: requested_actions.clone(),
                cancelled_actions: Vec::new(),
                force_run_dependencies: *force_run_dependencies,
                will_notify: *will_notify,
                created_at_ms: *created_at_ms,
            });
        }

        Event::JobRequestCancelled { id, actions } => {
            if let Some(request) = state.job_requests.get_mut(id) {
                request.record_cancellations(actions);
            }
        }

        _ => {}
    }
}
