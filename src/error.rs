use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::db::StoreError;

#[derive(Debug)]
pub enum AppError {
    /// Required body fields absent; carries the field list for `details`.
    MissingFields(&'static str),
    BadRequest(String),
    NotFound(String),
    RouteNotFound { method: String, path: String },
    Conflict(String),
    /// Body larger than the configured limit, in bytes.
    PayloadTooLarge(usize),
    Database(sqlx::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::MissingFields(fields) => write!(f, "Missing required fields: {fields}"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::RouteNotFound { method, path } => {
                write!(f, "Not Found: no route for {method} {path}")
            }
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::PayloadTooLarge(limit) => {
                write!(f, "Payload Too Large: body exceeds {limit} bytes")
            }
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AppError::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                "Missing required fields".to_string(),
                Some(format!("Required: {fields}")),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::RouteNotFound { method, path } => (
                StatusCode::NOT_FOUND,
                "Not Found".to_string(),
                Some(format!("No route for {method} {path}")),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            AppError::PayloadTooLarge(limit) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Payload too large".to_string(),
                Some(format!("Request body exceeds {limit} bytes")),
            ),
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({ "success": false, "error": message });
        if let Some(details) = details {
            body["details"] = json!(details);
        }
        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateCustomId(custom_id) => AppError::Conflict(format!(
                "A workflow with custom_id '{custom_id}' already exists"
            )),
            StoreError::Database(err) => AppError::Database(err),
        }
    }
}
