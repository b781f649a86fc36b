// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline YAML parsing

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

/// File name of the pipeline definition within a repo.
pub const PIPELINE_FILE: &str = "project.yaml";

/// Synthetic action that depends on every real action.
pub const RUN_ALL: &str = "run_all";

/// Errors from pipeline parsing
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid project.yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("project.yaml defines no actions")]
    NoActions,
    #[error("action \"run_all\" is reserved")]
    ReservedName,
    #[error("action \"{action}\" needs unknown action \"{needs}\"")]
    UnknownDependency { action: String, needs: String },
}

/// A named action from the pipeline definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub name: String,
    pub needs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PipelineFile {
    #[serde(default)]
    actions: IndexMap<String, ActionSpec>,
}

#[derive(Debug, Deserialize)]
struct ActionSpec {
    #[serde(default)]
    needs: Vec<String>,
}

/// Parse the action list, in file order, with [`RUN_ALL`] appended.
///
/// Unknown top-level keys and per-action keys other than `needs` are
/// ignored; the backend is the authority on how actions run.
pub fn parse_actions(content: &str) -> Result<Vec<Action>, PipelineError> {
    let file: PipelineFile = serde_yaml::from_str(content)?;
    if file.actions.is_empty() {
        return Err(PipelineError::NoActions);
    }

    let mut actions = Vec::with_capacity(file.actions.len() + 1);
    for (name, def) in &file.actions {
        if name == RUN_ALL {
            return Err(PipelineError::ReservedName);
        }
        if let Some(missing) = def.needs.iter().find(|n| !file.actions.contains_key(*n)) {
            return Err(PipelineError::UnknownDependency {
                action: name.clone(),
                needs: missing.clone(),
            });
        }
        actions.push(Action { name: name.clone(), needs: def.needs.clone() });
    }

    let all = actions.iter().map(|a| a.name.clone()).collect();
    actions.push(Action { name: RUN_ALL.to_string(), needs: all });
    tracing::debug!(count = actions.len(), "parsed pipeline actions");
    Ok(actions)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
