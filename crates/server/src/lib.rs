// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! js-server: the job server's HTTP surface, persistence lifecycle, and
//! process configuration

pub mod app;
pub mod auth;
pub mod config;
pub mod env;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod routes;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_helpers;

pub use app::{AppState, Deps, Production};
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use store::Store;
