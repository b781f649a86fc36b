// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server configuration: an optional TOML file, then environment overrides.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use js_adapters::github::DEFAULT_API_URL;
use serde::Deserialize;
use thiserror::Error;

use crate::env;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubConfig {
    pub api_url: String,
    /// Organisation whose members may run jobs and whose repos back workspaces.
    pub org: String,
    pub token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self { api_url: DEFAULT_API_URL.to_string(), org: "opensafely".to_string(), token: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub state_dir: PathBuf,
    pub bind: SocketAddr,
    /// Prefix for the absolute URLs in API responses.
    pub base_url: String,
    pub login_url: String,
    pub user_header: String,
    /// Usernames provisioned as superusers.
    pub admin_users: Vec<String>,
    /// Backends offered by the run form; the first is the default.
    pub backends: Vec<String>,
    pub github: GithubConfig,
    pub page_size: usize,
    pub stale_after_secs: u64,
    pub checkpoint_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_dir: env::default_state_dir(),
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, 8000)),
            base_url: "http://localhost:8000".to_string(),
            login_url: "/login/".to_string(),
            user_header: "X-Forwarded-User".to_string(),
            admin_users: Vec::new(),
            backends: vec!["tpp".to_string(), "emis".to_string(), "expectations".to_string()],
            github: GithubConfig::default(),
            page_size: 25,
            stale_after_secs: 5 * 60,
            checkpoint_interval_secs: 60,
        }
    }
}

impl Config {
    /// Load from `path` when given, apply environment overrides, and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_env(&mut self) {
        if let Some(dir) = env::state_dir() {
            self.state_dir = dir;
        }
        if let Some(bind) = env::bind() {
            self.bind = bind;
        }
        if let Some(backends) = env::backends() {
            self.backends = backends;
        }
        if let Some(url) = env::base_url() {
            self.base_url = url;
        }
        if let Some(url) = env::login_url() {
            self.login_url = url;
        }
        if let Some(header) = env::user_header() {
            self.user_header = header;
        }
        if let Some(admins) = env::admin_users() {
            self.admin_users = admins;
        }
        if let Some(org) = env::github_org() {
            self.github.org = org;
        }
        if let Some(token) = env::github_token() {
            self.github.token = Some(token);
        }
        if let Some(url) = env::github_api_url() {
            self.github.api_url = url;
        }
        if let Some(size) = env::page_size() {
            self.page_size = size;
        }
        if let Some(stale) = env::stale_after() {
            self.stale_after_secs = stale.as_secs();
        }
        if let Some(interval) = env::checkpoint_interval() {
            self.checkpoint_interval_secs = interval.as_secs();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backends.is_empty() {
            return Err(ConfigError::Invalid("at least one backend must be configured".into()));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be positive".into()));
        }
        if self.user_header.trim().is_empty() {
            return Err(ConfigError::Invalid("user_header must not be empty".into()));
        }
        if axum::http::HeaderName::try_from(self.user_header.as_str()).is_err() {
            return Err(ConfigError::Invalid(format!(
                "user_header {:?} is not a valid header name",
                self.user_header
            )));
        }
        Ok(())
    }

    pub fn is_admin(&self, username: &str) -> bool {
        self.admin_users.iter().any(|admin| admin == username)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    pub fn checkpoint_interval(&self) -> Duration {
        Duration::from_secs(self.checkpoint_interval_secs.max(1))
    }

    pub fn lock_path(&self) -> PathBuf {
        self.state_dir.join("jobserver.pid")
    }

    pub fn wal_path(&self) -> PathBuf {
        self.state_dir.join("wal").join("events.wal")
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.state_dir.join("snapshot.json")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.state_dir.join("logs")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
