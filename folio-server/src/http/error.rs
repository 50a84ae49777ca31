//! API error types with IntoResponse
//!
//! Errors become `{"detail": ...}` JSON bodies with the matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::{ValidationError, ValidationErrors};
use crate::service::ContactError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (422)
    Validation(ValidationErrors),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: i64 },

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    /// Request could not be decoded (bad JSON, query string or path).
    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation(
            ValidationError::Malformed {
                field,
                reason: reason.into(),
            }
            .into(),
        )
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(errors) => {
                tracing::debug!("Validation failed: {}", errors);
                let fields: Vec<_> = errors
                    .iter()
                    .map(|e| json!({ "field": e.field(), "message": e.to_string() }))
                    .collect();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!({
                        "detail": errors.to_string(),
                        "errors": fields
                    }),
                )
            }
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "detail": format!("{} with id {} not found", capitalize(resource), id)
                }),
            ),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ContactError> for ApiError {
    fn from(e: ContactError) -> Self {
        match e {
            ContactError::Validation(errors) => Self::Validation(errors),
            ContactError::NotFound { id } => Self::NotFound {
                resource: "contact",
                id,
            },
            ContactError::Storage(db) => Self::Database(db),
        }
    }
}
