// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the server crate.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn list(name: &str) -> Option<Vec<String>> {
    var(name).map(|raw| {
        raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
    })
}

/// State directory override: `JOBSERVER_STATE_DIR`
pub fn state_dir() -> Option<PathBuf> {
    var("JOBSERVER_STATE_DIR").map(PathBuf::from)
}

/// Default state directory: XDG_STATE_HOME/jobserver > ~/.local/state/jobserver
pub fn default_state_dir() -> PathBuf {
    if let Some(xdg) = var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("jobserver");
    }
    dirs::home_dir()
        .map(|home| home.join(".local/state"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("jobserver")
}

pub fn bind() -> Option<SocketAddr> {
    var("JOBSERVER_BIND").and_then(|s| s.parse().ok())
}

/// Backends offered by the run form, comma separated: `BACKENDS`
pub fn backends() -> Option<Vec<String>> {
    list("BACKENDS")
}

pub fn base_url() -> Option<String> {
    var("JOBSERVER_BASE_URL")
}

pub fn login_url() -> Option<String> {
    var("JOBSERVER_LOGIN_URL")
}

/// Trusted header carrying the authenticated username.
pub fn user_header() -> Option<String> {
    var("JOBSERVER_USER_HEADER")
}

pub fn admin_users() -> Option<Vec<String>> {
    list("JOBSERVER_ADMIN_USERS")
}

pub fn github_org() -> Option<String> {
    var("GITHUB_ORG")
}

pub fn github_token() -> Option<String> {
    var("GITHUB_TOKEN")
}

pub fn github_api_url() -> Option<String> {
    var("GITHUB_API_URL")
}

pub fn page_size() -> Option<usize> {
    var("JOBSERVER_PAGE_SIZE").and_then(|s| s.parse::<usize>().ok())
}

/// How long a backend may stay silent before the dashboard warns.
pub fn stale_after() -> Option<Duration> {
    var("JOBSERVER_STALE_AFTER_SECS").and_then(|s| s.parse::<u64>().ok()).map(Duration::from_secs)
}

pub fn checkpoint_interval() -> Option<Duration> {
    var("JOBSERVER_CHECKPOINT_SECS").and_then(|s| s.parse::<u64>().ok()).map(Duration::from_secs)
}
