// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Org, project, and membership event handlers.

use js_core::{Event, Org, Project, ProjectMembership};

use super::MaterializedState;

pub(crate) fn apply(state: &mut MaterializedState, event: &Event) {
    match event {
        Event::OrgCreated { id, name, slug, created_by, created_at_ms } => {
            state.orgs.entry(*id).or_insert_with(|| Org {
                id: *id,
                name: name.clone(),
                slug: slug.clone(),
                created_by: *created_by,
                created_at_ms: *created_at_ms,
            });
        }

        Event::ProjectCreated {
            id,
            org,
            name,
            slug,
            project_lead,
            email,
            created_by,
            created_at_ms,
        } => {
            state.projects.entry(*id).or_insert_with(|| Project {
                id: *id,
                org: *org,
                name: name.clone(),
                slug: slug.clone(),
                project_lead: project_lead.clone(),
                email: email.clone(),
                created_by: *created_by,
                created_at_ms: *created_at_ms,
            });
        }

        Event::MembershipSet { project, user, roles } => {
            match state.memberships.iter_mut().find(|m| m.project == *project && m.user == *user) {
                Some(membership) => membership.roles = roles.clone(),
                None => state.memberships.push(ProjectMembership {
                    project: *project,
                    user: *user,
                    roles: roles.clone(),
                }),
            }
        }

        _ => {}
    }
}
