// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared router state.

use std::sync::Arc;

use js_adapters::{GithubMembership, GithubRepoHost, MembershipAdapter, RepoHostAdapter};
use js_core::{Clock, SystemClock};
use js_wire::Links;

use crate::config::Config;
use crate::store::Store;

/// The collaborators a server is built from.
pub trait Deps: Send + Sync + 'static {
    type Membership: MembershipAdapter;
    type RepoHost: RepoHostAdapter;
    type Clock: Clock;
}

/// GitHub collaborators and the system clock.
pub struct Production;

impl Deps for Production {
    type Membership = GithubMembership;
    type RepoHost = GithubRepoHost;
    type Clock = SystemClock;
}

pub struct AppState<D: Deps> {
    pub config: Arc<Config>,
    pub store: Store,
    pub links: Arc<Links>,
    pub membership: D::Membership,
    pub repo_host: D::RepoHost,
    pub clock: D::Clock,
}

impl<D: Deps> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            store: self.store.clone(),
            links: Arc::clone(&self.links),
            membership: self.membership.clone(),
            repo_host: self.repo_host.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<D: Deps> AppState<D> {
    pub fn new(
        config: Config,
        store: Store,
        membership: D::Membership,
        repo_host: D::RepoHost,
        clock: D::Clock,
    ) -> Self {
        let links = Links::new(&config.base_url);
        Self {
            config: Arc::new(config),
            store,
            links: Arc::new(links),
            membership,
            repo_host,
            clock,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }

    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested.filter(|n| *n > 0).unwrap_or(self.config.page_size).min(100)
    }
}
