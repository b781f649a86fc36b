// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed request and response bodies for the job server.
//!
//! Wire format: JSON. Timestamps are RFC 3339 strings in UTC.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod links;
mod request;
mod response;
pub mod time;
mod validate;
mod view;

pub use links::Links;
pub use request::{
    flag, invalid_choice, unknown_branch, unknown_identifier, ArchiveForm, CreateJob,
    CreateWorkspace, IdentifierForm, JobListQuery, JobRequestQuery, MembershipForm, NewJob,
    NotificationsForm, OrgForm, ProjectForm, RunChoice, RunForm, SettingsForm, UpdateJob,
    UpdateJobRequest, INVALID_EMAIL, NO_ACTIONS_SELECTED, UNKNOWN_REPO, WORKSPACE_EXISTS,
    WORKSPACE_IMMUTABLE,
};
pub use response::{JobRequestResponse, JobResponse, JobSummary, Paginated, WorkspaceResponse};
pub use validate::{FieldErrors, NON_FIELD_ERRORS, REQUIRED};
pub use view::{
    ActionView, BackendStatusView, BackendView, IndexView, JobDetailView, JobRequestDetailView,
    JobRequestListView, JobRequestRow, MembershipView, OrgView, ProjectView, RedirectBody,
    ReleaseOutput, RepoView, SettingsView, StatusView, WorkspaceCreateView, WorkspaceDetailView,
    WorkspaceLink, WorkspaceLogView, WorkspaceReleaseView,
};
