//! HTTP error mapping.

use crate::application::SyncError;
use crate::config::ConfigError;
use crate::ports::provider::ProviderError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request validation failed")]
    Validation(ValidationErrors),

    #[error("Invalid JSON in request body: {0}")]
    InvalidJson(String),

    #[error("Request body does not match the expected shape: {0}")]
    InvalidBody(String),

    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => ApiError::InvalidBody(e.body_text()),
            other => ApiError::InvalidJson(other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}

impl ApiError {
    /// Single-field validation failure.
    pub fn invalid_field(field: &'static str, code: &'static str, message: &'static str) -> Self {
        let mut error = ValidationError::new(code);
        error.message = Some(Cow::Borrowed(message));
        let mut errors = ValidationErrors::new();
        errors.add(field, error);
        ApiError::Validation(errors)
    }

    /// HTTP status, stable error code and client-facing message.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::Validation(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                self.to_string(),
            ),
            ApiError::InvalidBody(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                "Request validation failed".to_string(),
            ),
            ApiError::InvalidJson(_) => (
                StatusCode::BAD_REQUEST,
                "INVALID_JSON",
                "Invalid JSON in request body".to_string(),
            ),
            ApiError::InvalidQuery(_) => (
                StatusCode::BAD_REQUEST,
                "INVALID_QUERY",
                "Invalid query string".to_string(),
            ),
            ApiError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIGURATION_ERROR",
                "Server configuration error".to_string(),
            ),
            ApiError::Sync(err) => sync_parts(err),
        }
    }

    fn field_errors(&self) -> Option<BTreeMap<String, Vec<String>>> {
        let ApiError::Validation(errors) = self else {
            return None;
        };
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        Some(fields)
    }

    /// JSON document describing the error.
    pub fn body(&self) -> Value {
        let (status, code, message) = self.parts();
        let mut body = json!({
            "success": false,
            "message": message,
            "error_code": code,
            "statusCode": status.as_u16(),
        });
        if let Some(errors) = self.field_errors() {
            body["errors"] = json!(errors);
        }
        body
    }
}

fn sync_parts(err: &SyncError) -> (StatusCode, &'static str, String) {
    match err {
        SyncError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            "VIDEO_NOT_FOUND",
            "Video not found".to_string(),
        ),
        SyncError::Duplicate(_) => (
            StatusCode::CONFLICT,
            "VIDEO_ALREADY_EXISTS",
            "This video already exists in the database".to_string(),
        ),
        SyncError::InvalidStatusCode(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            "Processing status must be between 0 and 5".to_string(),
        ),
        SyncError::Storage(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "DATABASE_ERROR",
            "Internal server error occurred".to_string(),
        ),
        SyncError::Remote(remote) => remote_parts(remote),
    }
}

fn remote_parts(err: &ProviderError) -> (StatusCode, &'static str, String) {
    match err {
        ProviderError::Status { status: 400, .. } => (
            StatusCode::BAD_REQUEST,
            "EXTERNAL_API_BAD_REQUEST",
            "Invalid request to video service".to_string(),
        ),
        ProviderError::Status { status: 401, .. } => (
            StatusCode::UNAUTHORIZED,
            "EXTERNAL_API_UNAUTHORIZED",
            "Video service authentication failed - check API key".to_string(),
        ),
        ProviderError::Status { status: 403, .. } => (
            StatusCode::FORBIDDEN,
            "EXTERNAL_API_FORBIDDEN",
            "Access denied to video service".to_string(),
        ),
        ProviderError::Status { status: 404, .. } => (
            StatusCode::NOT_FOUND,
            "EXTERNAL_VIDEO_NOT_FOUND",
            "Video not found in external service".to_string(),
        ),
        ProviderError::Status { status: 429, .. } => (
            StatusCode::TOO_MANY_REQUESTS,
            "RATE_LIMIT_EXCEEDED",
            "Too many requests to video service, please try again later".to_string(),
        ),
        ProviderError::Status { status, .. } => {
            let client_error = StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error());
            match client_error {
                Some(status) => (
                    status,
                    "EXTERNAL_API_ERROR",
                    "Request rejected by video service".to_string(),
                ),
                None => (
                    StatusCode::BAD_GATEWAY,
                    "EXTERNAL_API_ERROR",
                    "Video service is currently unavailable".to_string(),
                ),
            }
        }
        ProviderError::Timeout(_) => (
            StatusCode::GATEWAY_TIMEOUT,
            "REQUEST_TIMEOUT",
            "Request to video service timed out".to_string(),
        ),
        ProviderError::Transport(_) | ProviderError::Decode(_) => (
            StatusCode::BAD_GATEWAY,
            "NETWORK_ERROR",
            "Failed to connect to video service".to_string(),
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, _) = self.parts();
        if status.is_server_error() {
            tracing::error!(error_code = code, error = %self, "Request failed");
        } else {
            tracing::warn!(error_code = code, error = %self, "Request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
