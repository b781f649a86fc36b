// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace event handlers.

use js_core::{Event, Workspace};

use super::MaterializedState;

pub(crate) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::WorkspaceCreated {
            id,
            name,
            repo,
            branch,
            db,
            project,
            created_by,
            created_at_ms,
            should_notify,
        } => {
            state.workspaces.entry(*id).or_insert_with(|| Workspace {
                id: *id,
                name: name.clone(),
                repo: repo.clone(),
                branch: branch.clone(),
                db: db.clone(),
                project: *project,
                created_by: *created_by,
                created_at_ms: *created_at_ms,
                is_archived: false,
                should_notify: *should_notify,
            });
        }

        Event::WorkspaceArchiveSet { id, archived } => {
            if let Some(ws) = state.workspaces.get_mut(id) {
                ws.is_archived = *archived;
            }
        }

        Event::WorkspaceNotificationsSet { id, enabled } => {
            if let Some(ws) = state.workspaces.get_mut(id) {
                ws.should_notify = *enabled;
            }
        }

        _ => {}
    }
}
