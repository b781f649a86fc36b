// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Organisations, projects, and project memberships.

use crate::user::UserId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Primary key of an organisation.
    pub struct OrgId;
}

crate::define_id! {
    /// Primary key of a project.
    pub struct ProjectId;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Org {
    pub id: OrgId,
    pub name: String,
    pub slug: String,
    pub created_by: UserId,
    pub created_at_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub org: OrgId,
    pub name: String,
    /// Unique within the org.
    pub slug: String,
    pub project_lead: String,
    pub email: String,
    pub created_by: UserId,
    pub created_at_ms: u64,
}

/// Roles a user can hold on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    ProjectCoordinator,
    /// May run jobs in the project's workspaces.
    ProjectDeveloper,
}

crate::simple_display! {
    ProjectRole {
        ProjectCoordinator => "project_coordinator",
        ProjectDeveloper => "project_developer",
    }
}

impl std::str::FromStr for ProjectRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "project_coordinator" => Ok(ProjectRole::ProjectCoordinator),
            "project_developer" => Ok(ProjectRole::ProjectDeveloper),
            other => Err(format!("Unknown role \"{other}\"")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMembership {
    pub project: ProjectId,
    pub user: UserId,
    pub roles: Vec<ProjectRole>,
}

impl ProjectMembership {
    pub fn has_role(&self, role: ProjectRole) -> bool {
        self.roles.contains(&role)
    }
}

crate::builder! {
    pub struct OrgBuilder => Org {
        into {
            name: String = "Research Org",
            slug: String = "research-org",
        }
        set {
            id: OrgId = OrgId(1),
            created_by: UserId = UserId(1),
            created_at_ms: u64 = 1_000_000,
        }
    }
}

crate::builder! {
    pub struct ProjectBuilder => Project {
        into {
            name: String = "Covid Study",
            slug: String = "covid-study",
            project_lead: String = "Dr Lead",
            email: String = "lead@example.com",
        }
        set {
            id: ProjectId = ProjectId(1),
            org: OrgId = OrgId(1),
            created_by: UserId = UserId(1),
            created_at_ms: u64 = 1_000_000,
        }
    }
}
