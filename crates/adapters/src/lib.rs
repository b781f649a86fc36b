// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! js-adapters: external collaborators of the job server

pub mod github;
pub mod membership;
pub mod repo_host;

use thiserror::Error;

pub use github::GithubClient;
pub use membership::{GithubMembership, MembershipAdapter};
pub use repo_host::{GithubRepoHost, Repo, RepoHostAdapter};

#[cfg(any(test, feature = "test-support"))]
pub use membership::FakeMembership;
#[cfg(any(test, feature = "test-support"))]
pub use repo_host::{FakeRepoHost, RepoHostCall};

/// Errors from collaborator calls
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("invalid adapter configuration: {0}")]
    Config(String),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("not a repository URL: {0}")]
    RepoUrl(String),
    #[error("{0}")]
    Upstream(String),
}
