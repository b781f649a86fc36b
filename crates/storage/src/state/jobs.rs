// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job event handlers.

use js_core::{zombify, Event, Job};

use super::MaterializedState;

pub(crate) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::JobCreated {
            id,
            identifier,
            job_request,
            action,
            status,
            status_message,
            created_at_ms,
        } => {
            // Orphan jobs would never be reachable from a request
            if !state.job_requests.contains_key(job_request) {
                tracing::warn!(job = %id, request = %job_request, "job for unknown request");
                return;
            }
            state.jobs.entry(*id).or_insert_with(|| Job {
                id: *id,
                identifier: identifier.clone(),
                job_request: *job_request,
                action: action.clone(),
                status: *status,
                status_message: status_message.clone(),
                created_at_ms: *created_at_ms,
                updated_at_ms: *created_at_ms,
                started_at_ms: None,
                completed_at_ms: None,
                outputs: Vec::new(),
            });
        }

        Event::JobUpdated { id, progress, at_ms } => {
            if let Some(job) = state.jobs.get_mut(id) {
                job.apply_progress(progress, *at_ms);
            }
        }

        Event::JobOutputsSet { id, outputs } => {
            if let Some(job) = state.jobs.get_mut(id) {
                if job.outputs.is_empty() {
                    job.outputs = outputs.clone();
                }
            }
        }

        Event::JobZombified { id, at_ms } => {
            if let Some(job) = state.jobs.get_mut(id) {
                zombify::zombify(job, *at_ms);
            }
        }

        _ => {}
    }
}
