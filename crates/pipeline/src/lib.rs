// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! js-pipeline: parsing of a repository's pipeline definition
//!
//! The definition lives in `project.yaml` at the root of a research repo and
//! names the actions a job request may ask for, with their dependencies.

mod parser;

pub use parser::{parse_actions, Action, PipelineError, PIPELINE_FILE, RUN_ALL};
