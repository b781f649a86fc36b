// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handler errors and their HTTP rendering.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use js_adapters::AdapterError;
use js_core::{JobError, JobRequestError};
use js_storage::WalError;
use js_wire::{FieldErrors, RedirectBody, NON_FIELD_ERRORS};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found.")]
    NotFound,

    #[error("{0}")]
    Validation(FieldErrors),

    /// UI paths send the viewer to log in, then back to the given location.
    #[error("login required")]
    LoginRequired(String),

    #[error("Invalid or missing backend token.")]
    Unauthenticated,

    #[error(transparent)]
    Upstream(#[from] AdapterError),

    #[error(transparent)]
    Storage(#[from] WalError),
}

impl ApiError {
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation(FieldErrors::single(field, message))
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JobError> for ApiError {
    fn from(e: JobError) -> Self {
        match e {
            JobError::OutputsAlreadySet => ApiError::field(NON_FIELD_ERRORS, e.to_string()),
            JobError::UnknownStatus(_) | JobError::InvalidTransition { .. } => {
                ApiError::field("status", e.to_string())
            }
        }
    }
}

impl From<JobRequestError> for ApiError {
    fn from(e: JobRequestError) -> Self {
        match e {
            JobRequestError::BackendImmutable => ApiError::field("backend", e.to_string()),
            JobRequestError::UnknownStatus(_) => ApiError::field("status", e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::field(NON_FIELD_ERRORS, e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::field(NON_FIELD_ERRORS, e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": self.to_string() }))).into_response()
            }
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::LoginRequired(location) => Redirect::to(location).into_response(),
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": self.to_string() })))
                    .into_response()
            }
            ApiError::Upstream(e) => {
                tracing::warn!(error = %e, "collaborator call failed");
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() }))).into_response()
            }
            ApiError::Storage(e) => {
                tracing::error!(error = %e, "failed to persist events");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

/// 302 answer to a form post, with an optional flash message in the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    location: String,
    message: Option<String>,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self { location: location.into(), message: None }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl IntoResponse for Redirect {
    fn into_response(self) -> Response {
        let body = RedirectBody { location: self.location.clone(), message: self.message };
        (StatusCode::FOUND, [(header::LOCATION, self.location)], Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
