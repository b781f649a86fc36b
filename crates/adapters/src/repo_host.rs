// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository host: repos, branch heads, and pipeline definitions.

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use serde::{Deserialize, Serialize};

use crate::github::{repo_path, GithubClient};
use crate::AdapterError;

/// File holding a repo's pipeline definition.
pub const PIPELINE_PATH: &str = "project.yaml";

/// A repository that workspaces may be created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repo {
    pub name: String,
    pub url: String,
    pub branches: Vec<String>,
}

#[async_trait]
pub trait RepoHostAdapter: Clone + Send + Sync + 'static {
    /// Every repo of the organisation with its branch names.
    async fn repos_with_branches(&self) -> Result<Vec<Repo>, AdapterError>;

    /// Head commit of `branch` in the repo at `repo_url`.
    async fn branch_sha(&self, repo_url: &str, branch: &str) -> Result<String, AdapterError>;

    /// Raw pipeline YAML at the head of `branch`.
    async fn pipeline_definition(&self, repo_url: &str, branch: &str)
        -> Result<String, AdapterError>;
}

#[derive(Deserialize)]
struct RepoItem {
    name: String,
    html_url: String,
}

#[derive(Deserialize)]
struct BranchItem {
    name: String,
}

#[derive(Deserialize)]
struct BranchDetail {
    commit: CommitRef,
}

#[derive(Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Clone, Debug)]
pub struct GithubRepoHost {
    client: GithubClient,
}

impl GithubRepoHost {
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RepoHostAdapter for GithubRepoHost {
    async fn repos_with_branches(&self) -> Result<Vec<Repo>, AdapterError> {
        let org = self.client.org();
        let items: Vec<RepoItem> = self.client.get_all(&format!("/orgs/{org}/repos")).await?;

        let mut repos = Vec::with_capacity(items.len());
        for item in items {
            let branches: Vec<BranchItem> =
                self.client.get_all(&format!("/repos/{org}/{}/branches", item.name)).await?;
            repos.push(Repo {
                name: item.name,
                url: item.html_url,
                branches: branches.into_iter().map(|b| b.name).collect(),
            });
        }
        repos.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        tracing::debug!(count = repos.len(), "fetched repos");
        Ok(repos)
    }

    async fn branch_sha(&self, repo_url: &str, branch: &str) -> Result<String, AdapterError> {
        let (owner, name) = repo_path(repo_url)?;
        let detail: BranchDetail =
            self.client.get_json(&format!("/repos/{owner}/{name}/branches/{branch}")).await?;
        Ok(detail.commit.sha)
    }

    async fn pipeline_definition(
        &self,
        repo_url: &str,
        branch: &str,
    ) -> Result<String, AdapterError> {
        let (owner, name) = repo_path(repo_url)?;
        let path = format!("/repos/{owner}/{name}/contents/{PIPELINE_PATH}?ref={branch}");
        let request =
            self.client.get(&path).header(ACCEPT, HeaderValue::from_static("application/vnd.github.raw"));
        let response = self.client.send(&path, request).await?;
        let response = self.client.check(&path, response)?;
        response
            .text()
            .await
            .map_err(|e| AdapterError::Decode { url: self.client.url(&path), message: e.to_string() })
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Repo, RepoHostAdapter};
    use crate::AdapterError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Recorded repo-host call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum RepoHostCall {
        ReposWithBranches,
        BranchSha { repo: String, branch: String },
        PipelineDefinition { repo: String, branch: String },
    }

    #[derive(Default)]
    struct FakeRepoHostState {
        repos: Vec<Repo>,
        shas: HashMap<(String, String), String>,
        pipelines: HashMap<String, String>,
        failure: Option<String>,
        calls: Vec<RepoHostCall>,
    }

    /// Fake repo host for testing. Pipelines are keyed by repo URL and
    /// shared by every branch.
    #[derive(Clone, Default)]
    pub struct FakeRepoHost {
        inner: Arc<Mutex<FakeRepoHostState>>,
    }

    impl FakeRepoHost {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_repo(&self, name: &str, url: &str, branches: &[&str]) {
            self.inner.lock().repos.push(Repo {
                name: name.to_string(),
                url: url.to_string(),
                branches: branches.iter().map(|b| b.to_string()).collect(),
            });
        }

        pub fn set_sha(&self, repo_url: &str, branch: &str, sha: &str) {
            self.inner.lock().shas.insert((repo_url.to_string(), branch.to_string()), sha.to_string());
        }

        pub fn set_pipeline(&self, repo_url: &str, yaml: &str) {
            self.inner.lock().pipelines.insert(repo_url.to_string(), yaml.to_string());
        }

        /// Make every subsequent call fail with an upstream error.
        pub fn fail_with(&self, message: &str) {
            self.inner.lock().failure = Some(message.to_string());
        }

        pub fn calls(&self) -> Vec<RepoHostCall> {
            self.inner.lock().calls.clone()
        }

        fn record(&self, call: RepoHostCall) -> Result<(), AdapterError> {
            let mut inner = self.inner.lock();
            inner.calls.push(call);
            match &inner.failure {
                Some(message) => Err(AdapterError::Upstream(message.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl RepoHostAdapter for FakeRepoHost {
        async fn repos_with_branches(&self) -> Result<Vec<Repo>, AdapterError> {
            self.record(RepoHostCall::ReposWithBranches)?;
            Ok(self.inner.lock().repos.clone())
        }

        async fn branch_sha(&self, repo_url: &str, branch: &str) -> Result<String, AdapterError> {
            self.record(RepoHostCall::BranchSha {
                repo: repo_url.to_string(),
                branch: branch.to_string(),
            })?;
            let key = (repo_url.to_string(), branch.to_string());
            Ok(self.inner.lock().shas.get(&key).cloned().unwrap_or_else(|| "0".repeat(40)))
        }

        async fn pipeline_definition(
            &self,
            repo_url: &str,
            branch: &str,
        ) -> Result<String, AdapterError> {
            self.record(RepoHostCall::PipelineDefinition {
                repo: repo_url.to_string(),
                branch: branch.to_string(),
            })?;
            self.inner
                .lock()
                .pipelines
                .get(repo_url)
                .cloned()
                .ok_or_else(|| AdapterError::NotFound(format!("{repo_url}/project.yaml")))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRepoHost, RepoHostCall};
