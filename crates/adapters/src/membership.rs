// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Org-membership authority.

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::github::GithubClient;
use crate::AdapterError;

/// Answers whether a user belongs to the organisation allowed to run jobs.
#[async_trait]
pub trait MembershipAdapter: Clone + Send + Sync + 'static {
    async fn is_member(&self, username: &str) -> Result<bool, AdapterError>;
}

/// Membership check against `GET /orgs/{org}/members/{username}`.
#[derive(Clone, Debug)]
pub struct GithubMembership {
    client: GithubClient,
}

impl GithubMembership {
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MembershipAdapter for GithubMembership {
    async fn is_member(&self, username: &str) -> Result<bool, AdapterError> {
        let path = format!("/orgs/{}/members/{}", self.client.org(), username);
        let response = self.client.send(&path, self.client.get(&path)).await?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(true),
            StatusCode::NOT_FOUND | StatusCode::FOUND => {
                tracing::debug!(%username, "not an org member");
                Ok(false)
            }
            status => {
                tracing::warn!(%username, status = status.as_u16(), "membership check failed");
                Err(AdapterError::Status { status: status.as_u16(), url: self.client.url(&path) })
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::MembershipAdapter;
    use crate::AdapterError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeMembershipState {
        members: BTreeSet<String>,
        failure: Option<u16>,
        calls: Vec<String>,
    }

    /// Fake membership authority for testing
    #[derive(Clone, Default)]
    pub struct FakeMembership {
        inner: Arc<Mutex<FakeMembershipState>>,
    }

    impl FakeMembership {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_members(members: &[&str]) -> Self {
            let fake = Self::new();
            for member in members {
                fake.add_member(member);
            }
            fake
        }

        pub fn add_member(&self, username: &str) {
            self.inner.lock().members.insert(username.to_string());
        }

        /// Make every subsequent check fail with the given upstream status.
        pub fn fail_with(&self, status: u16) {
            self.inner.lock().failure = Some(status);
        }

        /// Usernames checked, in call order.
        pub fn calls(&self) -> Vec<String> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl MembershipAdapter for FakeMembership {
        async fn is_member(&self, username: &str) -> Result<bool, AdapterError> {
            let mut inner = self.inner.lock();
            inner.calls.push(username.to_string());
            if let Some(status) = inner.failure {
                return Err(AdapterError::Status { status, url: "fake://membership".into() });
            }
            Ok(inner.members.contains(username))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeMembership;
