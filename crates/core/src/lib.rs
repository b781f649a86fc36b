// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! js-core: domain types and state machines for the job server

pub mod macros;

pub mod backend;
pub mod cancel;
pub mod clock;
pub mod event;
pub mod filter;
pub mod id;
pub mod job;
pub mod job_request;
pub mod org;
pub mod user;
pub mod workspace;
pub mod zombify;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use backend::{Backend, BackendHealth, BackendId, BackendStats, QueueCounts};
pub use cancel::CancelOutcome;
pub use clock::{Clock, FakeClock, SystemClock};
pub use event::Event;
pub use filter::{Cursor, JobRequestFilter, Page, RequestRow, SearchTerm};
pub use job::{Job, JobError, JobId, JobOutput, JobProgress, JobStatus, StatusUpdate};
pub use job_request::{JobRequest, JobRequestError, JobRequestId, RequestStatus};
pub use org::{Org, OrgId, Project, ProjectId, ProjectMembership, ProjectRole};
pub use user::{RunAccess, User, UserId};
pub use workspace::{Workspace, WorkspaceId};
pub use zombify::ZombifyError;
