// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User event handlers.

use js_core::{Event, User};

use super::MaterializedState;

pub(crate) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::UserCreated { id, username, email, is_superuser, created_at_ms } => {
            state.users.entry(*id).or_insert_with(|| User {
                id: *id,
                username: username.clone(),
                email: email.clone(),
                notifications_email: String::new(),
                is_superuser: *is_superuser,
                selected_workspace: None,
                created_at_ms: *created_at_ms,
            });
        }

        Event::UserSettingsUpdated { id, notifications_email } => {
            if let Some(user) = state.users.get_mut(id) {
                user.notifications_email = notifications_email.clone();
            }
        }

        Event::UserWorkspaceSelected { id, workspace } => {
            if let Some(user) = state.users.get_mut(id) {
                user.selected_workspace = Some(*workspace);
            }
        }

        _ => {}
    }
}
