// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filtering, search, and keyset pagination over job requests.

use crate::job::Job;
use crate::job_request::{JobRequest, JobRequestId, RequestStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use thiserror::Error;

/// A job request joined with everything the filters look at.
#[derive(Debug, Clone)]
pub struct RequestRow<'a> {
    pub request: &'a JobRequest,
    pub jobs: Vec<&'a Job>,
    pub workspace: &'a str,
    pub username: &'a str,
}

impl RequestRow<'_> {
    pub fn status(&self) -> RequestStatus {
        self.request.status(&self.jobs)
    }

    fn cursor(&self) -> Cursor {
        Cursor { created_at_ms: self.request.created_at_ms, id: self.request.id }
    }
}

/// Parsed free-text search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// Matches a job id or job request id exactly, never action names.
    Id(u64),
    /// Case-insensitive substring of an action name (stored lowercased).
    Text(String),
}

impl SearchTerm {
    /// Blank input means no search.
    pub fn parse(q: &str) -> Option<Self> {
        let q = q.trim();
        if q.is_empty() {
            return None;
        }
        match q.parse::<u64>() {
            Ok(id) => Some(SearchTerm::Id(id)),
            Err(_) => Some(SearchTerm::Text(q.to_lowercase())),
        }
    }

    pub fn matches(&self, row: &RequestRow<'_>) -> bool {
        match self {
            SearchTerm::Id(id) => {
                row.request.id.get() == *id || row.jobs.iter().any(|job| job.id.get() == *id)
            }
            SearchTerm::Text(text) => {
                row.jobs.iter().any(|job| job.action.to_lowercase().contains(text))
                    || row.request.requested_actions.iter().any(|a| a.to_lowercase().contains(text))
            }
        }
    }
}

/// Conjunctive filter. `None` on a dimension means unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobRequestFilter {
    pub backend: Option<String>,
    pub status: Option<RequestStatus>,
    pub workspace: Option<String>,
    pub username: Option<String>,
    pub search: Option<SearchTerm>,
}

impl JobRequestFilter {
    pub fn matches(&self, row: &RequestRow<'_>) -> bool {
        if let Some(backend) = &self.backend {
            if &row.request.backend != backend {
                return false;
            }
        }
        if let Some(workspace) = &self.workspace {
            if !row.workspace.eq_ignore_ascii_case(workspace) {
                return false;
            }
        }
        if let Some(username) = &self.username {
            if row.username != username {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !search.matches(row) {
                return false;
            }
        }
        match self.status {
            Some(status) => row.status() == status,
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid cursor \"{0}\"")]
pub struct CursorError(pub String);

/// Position after the last row of a page: `(created_at, id)` of that row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub created_at_ms: u64,
    pub id: JobRequestId,
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.created_at_ms, self.id)
    }
}

impl std::str::FromStr for Cursor {
    type Err = CursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || CursorError(s.to_string());
        let (ms, id) = s.split_once('.').ok_or_else(err)?;
        Ok(Cursor {
            created_at_ms: ms.parse().map_err(|_| err())?,
            id: id.parse().map_err(|_| err())?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<Cursor>,
}

/// Order newest first (ties by id, descending) and cut one page after
/// `after`. Rows inserted ahead of the cursor never shift later pages.
pub fn paginate<'a>(
    mut rows: Vec<RequestRow<'a>>,
    after: Option<Cursor>,
    page_size: usize,
) -> Page<RequestRow<'a>> {
    rows.sort_by_key(|row| Reverse((row.request.created_at_ms, row.request.id)));
    if let Some(after) = after {
        let key = (after.created_at_ms, after.id);
        rows.retain(|row| (row.request.created_at_ms, row.request.id) < key);
    }
    let page_size = page_size.max(1);
    let has_more = rows.len() > page_size;
    rows.truncate(page_size);
    let next = if has_more { rows.last().map(RequestRow::cursor) } else { None };
    Page { items: rows, next }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
