// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Users and run authorization.

use crate::org::{ProjectMembership, ProjectRole};
use crate::workspace::{Workspace, WorkspaceId};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Primary key of a user.
    pub struct UserId;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub notifications_email: String,
    #[serde(default)]
    pub is_superuser: bool,
    /// Convenience pointer, not ownership.
    #[serde(default)]
    pub selected_workspace: Option<WorkspaceId>,
    pub created_at_ms: u64,
}

crate::builder! {
    pub struct UserBuilder => User {
        into {
            username: String = "user-1",
            email: String = "user-1@example.com",
            notifications_email: String = "",
        }
        set {
            id: UserId = UserId(1),
            is_superuser: bool = false,
            created_at_ms: u64 = 1_000_000,
        }
        option {
            selected_workspace: WorkspaceId = None,
        }
    }
}

/// Outcome of the local part of a run-permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAccess {
    Granted,
    /// Ask the org-membership authority.
    NeedsOrgMembership,
}

/// Superusers and developers on the workspace's project may act without
/// consulting the org-membership authority.
pub fn run_access(
    user: &User,
    workspace: &Workspace,
    memberships: &[&ProjectMembership],
) -> RunAccess {
    if user.is_superuser {
        return RunAccess::Granted;
    }
    let developer = workspace.project.is_some_and(|project| {
        memberships.iter().any(|m| {
            m.project == project && m.user == user.id && m.has_role(ProjectRole::ProjectDeveloper)
        })
    });
    if developer {
        RunAccess::Granted
    } else {
        RunAccess::NeedsOrgMembership
    }
}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;
