// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend and heartbeat event handlers.

use js_core::{Backend, Event};

use super::MaterializedState;

pub(crate) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::BackendCreated { id, name, display_name, auth_token, created_at_ms } => {
            state.backends.entry(*id).or_insert_with(|| Backend {
                id: *id,
                name: name.clone(),
                display_name: display_name.clone(),
                auth_token: auth_token.clone(),
                created_at_ms: *created_at_ms,
            });
        }

        Event::BackendTokenRotated { id, auth_token } => {
            if let Some(backend) = state.backends.get_mut(id) {
                backend.auth_token = auth_token.clone();
            }
        }

        Event::BackendSeen { id, at_ms, url } => {
            if !state.backends.contains_key(id) {
                return;
            }
            let stats = state.stats.entry(*id).or_default();
            // Replays may deliver an older heartbeat after a newer one
            if stats.api_last_seen_ms.is_none_or(|seen| seen <= *at_ms) {
                stats.api_last_seen_ms = Some(*at_ms);
                if url.is_some() {
                    stats.url = url.clone();
                }
            }
        }

        _ => {}
    }
}
