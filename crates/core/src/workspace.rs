// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspaces: a named binding of repo, branch, and database slice.

use crate::org::ProjectId;
use crate::user::UserId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Primary key of a workspace.
    pub struct WorkspaceId;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    /// Lowercase and unique.
    pub name: String,
    pub repo: String,
    pub branch: String,
    pub db: String,
    #[serde(default)]
    pub project: Option<ProjectId>,
    pub created_by: UserId,
    pub created_at_ms: u64,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub should_notify: bool,
}

crate::builder! {
    pub struct WorkspaceBuilder => Workspace {
        into {
            name: String = "workspace",
            repo: String = "https://github.com/opensafely/research",
            branch: String = "main",
            db: String = "full",
        }
        set {
            id: WorkspaceId = WorkspaceId(1),
            created_by: UserId = UserId(1),
            created_at_ms: u64 = 1_000_000,
            is_archived: bool = false,
            should_notify: bool = false,
        }
        option {
            project: ProjectId = None,
        }
    }
}

impl Workspace {
    /// Short repo name: the final path segment of the repo URL.
    pub fn repo_name(&self) -> &str {
        repo_name(&self.repo)
    }
}

/// Workspace names are compared and stored lowercased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Final path segment of a repository URL, without a `.git` suffix.
pub fn repo_name(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last)
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
