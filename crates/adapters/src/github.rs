// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal GitHub REST client shared by the membership and repo-host adapters.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{redirect, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::AdapterError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PER_PAGE: usize = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct GithubClient {
    http: Client,
    api_url: String,
    org: String,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_url", &self.api_url)
            .field("org", &self.org)
            .finish_non_exhaustive()
    }
}

impl GithubClient {
    /// Redirects are not followed: GitHub answers a membership query with
    /// 302 when the caller cannot see the org's members.
    pub fn new(api_url: &str, org: &str, token: Option<&str>) -> Result<Self, AdapterError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| AdapterError::Config("GitHub token is not a valid header".into()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(redirect::Policy::none())
            .user_agent(concat!("jobserver/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| AdapterError::Config(e.to_string()))?;

        Ok(Self { http, api_url: api_url.trim_end_matches('/').to_string(), org: org.to_string() })
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub async fn send(&self, path: &str, request: RequestBuilder) -> Result<Response, AdapterError> {
        request.send().await.map_err(|source| AdapterError::Transport { url: self.url(path), source })
    }

    /// GET a JSON document, mapping 404 to [`AdapterError::NotFound`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AdapterError> {
        let response = self.send(path, self.get(path)).await?;
        let response = self.check(path, response)?;
        response.json().await.map_err(|e| AdapterError::Decode { url: self.url(path), message: e.to_string() })
    }

    /// GET every page of a list endpoint.
    pub async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, AdapterError> {
        let separator = if path.contains('?') { '&' } else { '?' };
        let mut items = Vec::new();
        for page in 1.. {
            let page_path = format!("{path}{separator}per_page={PER_PAGE}&page={page}");
            let batch: Vec<T> = self.get_json(&page_path).await?;
            let done = batch.len() < PER_PAGE;
            items.extend(batch);
            if done {
                break;
            }
        }
        Ok(items)
    }

    pub fn check(&self, path: &str, response: Response) -> Result<Response, AdapterError> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(AdapterError::NotFound(path.to_string())),
            status => Err(AdapterError::Status { status: status.as_u16(), url: self.url(path) }),
        }
    }
}

/// Split a repository URL like `https://github.com/org/name` into owner and name.
pub fn repo_path(repo_url: &str) -> Result<(&str, &str), AdapterError> {
    let trimmed = repo_url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let mut parts = trimmed.rsplit('/');
    match (parts.next(), parts.next()) {
        (Some(name), Some(owner))
            if !name.is_empty() && !owner.is_empty() && !owner.contains(':') =>
        {
            Ok((owner, name))
        }
        _ => Err(AdapterError::RepoUrl(repo_url.to_string())),
    }
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
