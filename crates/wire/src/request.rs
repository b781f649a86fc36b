// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request bodies and query strings.
//!
//! Bodies are deserialized leniently and then checked field by field, so a
//! bad value yields a [`FieldErrors`] entry rather than a parse failure.

use js_core::{Cursor, JobOutput, JobStatus, ProjectRole, RequestStatus, StatusUpdate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::time;
use crate::validate::{FieldErrors, NON_FIELD_ERRORS, REQUIRED};

pub const NO_ACTIONS_SELECTED: &str = "Please select at least one of the Actions listed above.";
pub const WORKSPACE_IMMUTABLE: &str = "You cannot change a job's workspace";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const UNKNOWN_REPO: &str = "Unknown repo, please reload the page and try again";
pub const WORKSPACE_EXISTS: &str = "A workspace with this name already exists.";

pub fn unknown_branch(branch: &str) -> String {
    format!("Unknown branch \"{branch}\"")
}

pub fn unknown_identifier(identifier: &str) -> String {
    format!("Could not find a JobRequest with the identifier '{identifier}'")
}

pub fn invalid_choice(value: &str) -> String {
    format!("Select a valid choice. {value} is not one of the available choices.")
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Form-style booleans: JSON `true`/`false`, or the strings a checkbox or
/// select posts (`"True"`, `"on"`, `"1"`, `""`, `"False"`, ...).
pub mod flag {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    fn interpret<E: serde::de::Error>(raw: Raw) -> Result<bool, E> {
        match raw {
            Raw::Bool(b) => Ok(b),
            Raw::Int(i) => Ok(i != 0),
            Raw::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "1" | "yes" => Ok(true),
                "" | "false" | "off" | "0" | "no" => Ok(false),
                other => Err(E::custom(format!("invalid boolean {other:?}"))),
            },
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        interpret(Raw::deserialize(d)?)
    }

    pub mod opt {
        use super::*;

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
            match Option::<Raw>::deserialize(d)? {
                Some(raw) => interpret(raw).map(Some),
                None => Ok(None),
            }
        }
    }
}

// ── API ────────────────────────────────────────────────────────────────────

/// `POST /api/jobs/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateJob {
    #[serde(default)]
    pub job_request_id: Option<u64>,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_message: String,
    #[serde(default, with = "time::opt_ms")]
    pub started_at: Option<u64>,
    #[serde(default, with = "time::opt_ms")]
    pub completed_at: Option<u64>,
    #[serde(default)]
    pub outputs: Vec<JobOutput>,
    /// Accepted on create only; must name the request's workspace.
    #[serde(default)]
    pub workspace_id: Option<u64>,
}

/// A validated [`CreateJob`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub job_request_id: u64,
    pub action: String,
    pub identifier: Option<String>,
    pub status: JobStatus,
    pub status_message: String,
    pub started_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,
    pub outputs: Vec<JobOutput>,
    pub workspace_id: Option<u64>,
}

impl CreateJob {
    pub fn validate(self) -> Result<NewJob, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.job_request_id.is_none() {
            errors.add("job_request_id", REQUIRED);
        }
        errors.require("action", &self.action);
        let status = match non_blank(&self.status) {
            Some(raw) => raw.parse::<JobStatus>().unwrap_or_else(|e| {
                errors.add("status", e.to_string());
                JobStatus::default()
            }),
            None => JobStatus::default(),
        };
        let new_job = NewJob {
            job_request_id: self.job_request_id.unwrap_or_default(),
            action: self.action.trim().to_string(),
            identifier: non_blank(&self.identifier).map(str::to_string),
            status,
            status_message: self.status_message,
            started_at_ms: self.started_at,
            completed_at_ms: self.completed_at,
            outputs: self.outputs,
            workspace_id: self.workspace_id,
        };
        errors.into_result(new_job)
    }
}

/// `PATCH /api/jobs/{id}/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateJob {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default, with = "time::opt_ms")]
    pub started_at: Option<u64>,
    #[serde(default, with = "time::opt_ms")]
    pub completed_at: Option<u64>,
    #[serde(default)]
    pub outputs: Vec<JobOutput>,
    #[serde(default)]
    pub workspace_id: Option<u64>,
}

impl UpdateJob {
    /// Split into a status report and the outputs to attach.
    pub fn validate(self) -> Result<(StatusUpdate, Vec<JobOutput>), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.workspace_id.is_some() {
            errors.add(NON_FIELD_ERRORS, WORKSPACE_IMMUTABLE);
        }
        let status = match non_blank(&self.status) {
            Some(raw) => match raw.parse::<JobStatus>() {
                Ok(status) => Some(status),
                Err(e) => {
                    errors.add("status", e.to_string());
                    None
                }
            },
            // An explicit empty string means "unscheduled"
            None if self.status.is_some() => Some(JobStatus::Unscheduled),
            None => None,
        };
        let update = StatusUpdate {
            status,
            status_message: self.status_message,
            started_at_ms: self.started_at,
            completed_at_ms: self.completed_at,
        };
        errors.into_result((update, self.outputs))
    }
}

/// `PATCH /api/job-requests/{id}/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateJobRequest {
    #[serde(default)]
    pub backend: Option<String>,
}

/// `POST /api/workspaces/` and the workspace creation form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateWorkspace {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub db: String,
}

impl CreateWorkspace {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name);
        errors.require("repo", &self.repo);
        errors.require("branch", &self.branch);
        errors.require("db", &self.db);
        errors.into_result(())
    }
}

// ── UI forms ───────────────────────────────────────────────────────────────

/// Run form on a workspace page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunForm {
    #[serde(default)]
    pub requested_actions: Vec<String>,
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub force_run_dependencies: bool,
    #[serde(default, deserialize_with = "flag::opt::deserialize")]
    pub will_notify: Option<bool>,
}

/// The actions and backend a [`RunForm`] resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunChoice {
    pub actions: Vec<String>,
    pub backend: String,
}

impl RunForm {
    /// Check the selection against the workspace's actions and the
    /// configured backends. Only superusers may pick a backend; everyone
    /// else gets the first configured one.
    pub fn validate(
        &self,
        known_actions: &[&str],
        backends: &[String],
        is_superuser: bool,
    ) -> Result<RunChoice, FieldErrors> {
        let mut errors = FieldErrors::new();

        let mut actions: Vec<String> = Vec::new();
        for action in &self.requested_actions {
            if !known_actions.contains(&action.as_str()) {
                errors.add("requested_actions", invalid_choice(action));
            } else if !actions.contains(action) {
                actions.push(action.clone());
            }
        }
        if self.requested_actions.is_empty() {
            errors.add("requested_actions", NO_ACTIONS_SELECTED);
        }

        let backend = match (is_superuser, non_blank(&self.backend)) {
            (true, Some(chosen)) => {
                if !backends.iter().any(|b| b == chosen) {
                    errors.add("backend", invalid_choice(chosen));
                }
                chosen.to_string()
            }
            _ => match backends.first() {
                Some(first) => first.clone(),
                None => {
                    errors.add("backend", "No backends are configured");
                    String::new()
                }
            },
        };

        errors.into_result(RunChoice { actions, backend })
    }
}

/// Job request lookup on the list page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentifierForm {
    #[serde(default)]
    pub identifier: Option<String>,
}

impl IdentifierForm {
    pub fn validate(&self) -> Result<&str, FieldErrors> {
        non_blank(&self.identifier).ok_or_else(|| FieldErrors::single("identifier", REQUIRED))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchiveForm {
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub is_archived: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationsForm {
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub should_notify: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub notifications_email: String,
}

impl SettingsForm {
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let email = self.notifications_email.trim();
        let mut errors = FieldErrors::new();
        errors.require("notifications_email", email);
        if !email.is_empty() && !is_valid_email(email) {
            errors.add("notifications_email", INVALID_EMAIL);
        }
        errors.into_result(email.to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrgForm {
    #[serde(default)]
    pub name: String,
}

impl OrgForm {
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name);
        errors.into_result(self.name.trim().to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub project_lead: String,
    #[serde(default)]
    pub email: String,
}

impl ProjectForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name);
        errors.require("project_lead", &self.project_lead);
        errors.require("email", &self.email);
        let email = self.email.trim();
        if !email.is_empty() && !is_valid_email(email) {
            errors.add("email", INVALID_EMAIL);
        }
        errors.into_result(())
    }
}

/// Add or replace a user's roles on a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembershipForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl MembershipForm {
    pub fn validate(&self) -> Result<Vec<ProjectRole>, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("username", &self.username);
        let mut roles = Vec::new();
        for raw in &self.roles {
            match raw.parse::<ProjectRole>() {
                Ok(role) if !roles.contains(&role) => roles.push(role),
                Ok(_) => {}
                Err(_) => errors.add("roles", invalid_choice(raw)),
            }
        }
        errors.into_result(roles)
    }
}

// ── Query strings ──────────────────────────────────────────────────────────

/// Filters and paging for job request lists. Blank values are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobRequestQuery {
    #[serde(default)]
    pub backend: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub workspace: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl JobRequestQuery {
    pub fn backend(&self) -> Option<&str> {
        non_blank(&self.backend)
    }

    pub fn workspace(&self) -> Option<&str> {
        non_blank(&self.workspace)
    }

    pub fn username(&self) -> Option<&str> {
        non_blank(&self.username)
    }

    pub fn q(&self) -> Option<&str> {
        non_blank(&self.q)
    }

    pub fn status(&self) -> Result<Option<RequestStatus>, FieldErrors> {
        non_blank(&self.status)
            .map(|raw| raw.parse::<RequestStatus>())
            .transpose()
            .map_err(|e| FieldErrors::single("status", e.to_string()))
    }

    pub fn cursor(&self) -> Result<Option<Cursor>, FieldErrors> {
        non_blank(&self.cursor)
            .map(|raw| raw.parse::<Cursor>())
            .transpose()
            .map_err(|e| FieldErrors::single("cursor", e.to_string()))
    }
}

/// Paging for `GET /api/jobs/`, newest first. The cursor is the last job id seen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobListQuery {
    #[serde(default)]
    pub job_request_id: Option<u64>,
    #[serde(default)]
    pub cursor: Option<u64>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
