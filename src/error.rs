// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Error types for the search engine and their HTTP rendering.
//!
//! [`ApiError`] maps to the failure envelope
//! `{"success": false, "error": {"code", "message", "details"?}}`:
//! - `Validation` → 400 `VALIDATION_ERROR`
//! - `ServiceUnavailable` → 503 `SERVICE_UNAVAILABLE`
//! - `Internal` → 500 `INTERNAL_ERROR`

use crate::models::response::{ErrorBody, ErrorResponse, FieldError};
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Malformed or out-of-range request input, one entry per offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid search parameters: {}", summary(.details))]
pub struct ValidationError {
    pub details: Vec<FieldError>,
}

fn summary(details: &[FieldError]) -> String {
    details
        .iter()
        .map(|d| d.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn has_field(&self, field: &str) -> bool {
        self.details.iter().any(|d| d.field == field)
    }
}

/// Failure while executing a read against the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("store query exceeded {0} ms")]
    Timeout(u128),
    #[error("failed to decode store document: {0}")]
    Decode(String),
}

impl From<meilisearch_sdk::errors::Error> for StoreError {
    fn from(e: meilisearch_sdk::errors::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    ServiceUnavailable(String),
    /// Message is logged, never sent to the client
    Internal(String),
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Validation(v) => ApiError::Validation(v),
            SearchError::Store(s) => ApiError::Internal(s.to_string()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        let text = rejection.body_text();
        ApiError::Validation(ValidationError {
            details: vec![FieldError::new(
                rejected_field(&text),
                "could not be read from the query string; give each parameter at most once",
            )],
        })
    }
}

/// Serde names the offending key in backticks, e.g. "duplicate field `page`".
fn rejected_field(text: &str) -> String {
    text.split('`')
        .nth(1)
        .filter(|field| !field.is_empty())
        .unwrap_or("query")
        .to_string()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(v) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR".to_string(),
                    message: "Invalid search parameters".to_string(),
                    details: Some(v.details),
                },
            ),
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody {
                    code: "SERVICE_UNAVAILABLE".to_string(),
                    message: msg,
                    details: None,
                },
            ),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal error occurred".to_string(),
                        details: None,
                    },
                )
            }
        };

        let envelope = ErrorResponse {
            success: false,
            error: body,
        };
        (status, Json(envelope)).into_response()
    }
}
