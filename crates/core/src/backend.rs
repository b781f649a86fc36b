// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution backends, their heartbeat stats, and derived health.

use serde::{Deserialize, Serialize};
use std::time::Duration;

crate::define_id! {
    /// Primary key of a backend.
    pub struct BackendId;
}

/// How long a backend may go unseen before queued work raises a warning.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(5 * 60);

/// A named compute target that polls for work with a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backend {
    pub id: BackendId,
    /// Slug used in job requests (e.g. "tpp").
    pub name: String,
    pub display_name: String,
    pub auth_token: String,
    pub created_at_ms: u64,
}

crate::builder! {
    pub struct BackendBuilder => Backend {
        into {
            name: String = "tpp",
            display_name: String = "TPP",
            auth_token: String = "test-token",
        }
        set {
            id: BackendId = BackendId(1),
            created_at_ms: u64 = 1_000_000,
        }
    }
}

impl Backend {
    /// Token comparison that does not short-circuit on the first mismatch.
    pub fn authenticates(&self, token: &str) -> bool {
        let expected = self.auth_token.as_bytes();
        let given = token.as_bytes();
        if expected.is_empty() || expected.len() != given.len() {
            return false;
        }
        expected.iter().zip(given).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
    }
}

/// Last heartbeat seen from a backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStats {
    pub api_last_seen_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Unfinished job requests for a backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCounts {
    /// Requests the backend has created jobs for.
    pub acked: usize,
    /// Requests still waiting for the backend to pick them up.
    pub unacked: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendHealth {
    pub last_seen_ms: Option<u64>,
    pub queue: QueueCounts,
    pub show_warning: bool,
}

/// Warn when a backend has been silent for longer than `stale_after` while
/// work is waiting for it. A backend that was never seen does not warn.
pub fn health(
    stats: Option<&BackendStats>,
    queue: QueueCounts,
    now_ms: u64,
    stale_after: Duration,
) -> BackendHealth {
    let last_seen_ms = stats.and_then(|s| s.api_last_seen_ms);
    let stale = match last_seen_ms {
        Some(seen) => now_ms.saturating_sub(seen) > stale_after.as_millis() as u64,
        None => false,
    };
    BackendHealth { last_seen_ms, queue, show_warning: stale && queue.unacked > 0 }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
