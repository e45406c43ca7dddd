// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::extraction::ExtractionError;
use crate::fetch::FetchError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    pub request_id: Option<String>,
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    NotFound(String),
    InvalidRequest(String),
    ValidationError { field: String, message: String },
    Forbidden(String),
    ExtractionFailed(String),
    PayloadTooLarge(String),
    RateLimitExceeded { retry_after: u64 },
    UpstreamError(String),
    ServiceUnavailable(String),
    InternalError(String),
    Timeout(String),
}

impl ApiError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ApiError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn to_response(&self, request_id: Option<String>) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::Forbidden(msg) => ("forbidden", msg.clone(), None),
            ApiError::ExtractionFailed(reason) => (
                "extraction_failed",
                format!("Content extraction failed: {}", reason),
                None,
            ),
            ApiError::PayloadTooLarge(msg) => ("payload_too_large", msg.clone(), None),
            ApiError::RateLimitExceeded { retry_after } => {
                let mut details = HashMap::new();
                details.insert(
                    "retry_after".to_string(),
                    serde_json::Value::Number((*retry_after).into()),
                );
                (
                    "rate_limit_exceeded",
                    "Rate limit exceeded".to_string(),
                    Some(details),
                )
            }
            ApiError::UpstreamError(msg) => ("upstream_error", msg.clone(), None),
            ApiError::ServiceUnavailable(msg) => ("service_unavailable", msg.clone(), None),
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
            ApiError::Timeout(msg) => ("timeout", msg.clone(), None),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            request_id,
            details,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::InvalidRequest(_) => 400,
            ApiError::ValidationError { .. } | ApiError::ExtractionFailed(_) => 422,
            ApiError::Forbidden(_) => 403,
            ApiError::PayloadTooLarge(_) => 413,
            ApiError::RateLimitExceeded { .. } => 429,
            ApiError::UpstreamError(_) => 502,
            ApiError::ServiceUnavailable(_) => 503,
            ApiError::InternalError(_) => 500,
            ApiError::Timeout(_) => 504,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::ExtractionFailed(reason) => {
                write!(f, "Content extraction failed: {}", reason)
            }
            ApiError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            ApiError::RateLimitExceeded { retry_after } => write!(
                f,
                "Rate limit exceeded, retry after {} seconds",
                retry_after
            ),
            ApiError::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::Timeout(msg) => write!(f, "Timeout: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response(None))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::InvalidRequest(rejection.body_text())
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::InvalidUrl(_)
            | FetchError::BlockedPort(_)
            | FetchError::UnsupportedContentType(_) => ApiError::InvalidRequest(error.to_string()),
            FetchError::Forbidden(msg) => ApiError::Forbidden(msg),
            FetchError::Timeout(_) => ApiError::Timeout(error.to_string()),
            FetchError::TooLarge { .. } => ApiError::PayloadTooLarge(error.to_string()),
            FetchError::Http(_) | FetchError::UpstreamStatus { .. } => {
                ApiError::UpstreamError(error.to_string())
            }
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(error: ExtractionError) -> Self {
        match error {
            ExtractionError::Timeout { .. } => ApiError::Timeout(error.to_string()),
            ExtractionError::Task(_) => ApiError::InternalError(error.to_string()),
            _ => ApiError::ExtractionFailed(error.to_string()),
        }
    }
}
