// ABOUTME: Unified error type, error codes, and HTTP error response format
// ABOUTME: Every fallible operation in the service returns AppResult with a stable ErrorCode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Errors
//!
//! One error type for the whole service. Validation, quota, AI provider and
//! storage failures all carry an [`ErrorCode`] that fixes both the HTTP status
//! and the machine-readable name clients branch on.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable failure categories, serialized as SCREAMING_SNAKE names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Caller identity (1xxx)
    /// No dietitian identity on the request
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    /// Identity header present but unusable
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,

    // Quota (2xxx)
    /// Daily AI generation allowance spent
    #[serde(rename = "QUOTA_EXCEEDED")]
    QuotaExceeded = 2001,

    // Request validation (3xxx)
    /// Field present but not acceptable
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// Field absent or blank
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// Prompt or output refused by a safety filter
    #[serde(rename = "CONTENT_BLOCKED")]
    ContentBlocked = 3004,

    // Stored documents (4xxx)
    /// No such client, plan or record for this dietitian
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,

    // AI provider (5xxx)
    /// Provider answered with an error or an unusable body
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// Provider overloaded or down
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// Provider refused the configured API key
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,
    /// Provider throttled the key
    #[serde(rename = "EXTERNAL_RATE_LIMITED")]
    ExternalRateLimited = 5003,
    /// Provider did not answer within the configured timeout
    #[serde(rename = "EXTERNAL_TIMEOUT")]
    ExternalTimeout = 5004,

    // Configuration (6xxx)
    /// A setting has an unusable value
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// A setting the operation needs is absent
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,

    // Server faults (9xxx)
    /// Anything not covered above
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// SQLite failure
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    /// JSON encode or decode failure
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// HTTP status this code is reported with
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::ContentBlocked => 400,
            Self::AuthRequired | Self::AuthInvalid => 401,
            Self::ResourceNotFound => 404,
            Self::QuotaExceeded | Self::ExternalRateLimited => 429,
            Self::ExternalServiceError | Self::ExternalServiceUnavailable => 502,
            Self::ExternalAuthFailed => 503,
            Self::ExternalTimeout => 504,
            Self::InternalError
            | Self::DatabaseError
            | Self::SerializationError
            | Self::ConfigError
            | Self::ConfigMissing => 500,
        }
    }

    /// Short category label used as the `Display` prefix
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::AuthRequired => "Caller identity required",
            Self::AuthInvalid => "Caller identity invalid",
            Self::QuotaExceeded => "Daily AI generation quota exceeded",
            Self::InvalidInput => "Invalid input",
            Self::MissingRequiredField => "Missing required field",
            Self::ContentBlocked => "Blocked by safety filter",
            Self::ResourceNotFound => "Not found",
            Self::ExternalServiceError => "AI provider error",
            Self::ExternalServiceUnavailable => "AI provider unavailable",
            Self::ExternalAuthFailed => "AI provider rejected credentials",
            Self::ExternalRateLimited => "AI provider rate limit",
            Self::ExternalTimeout => "AI provider timed out",
            Self::ConfigError => "Invalid configuration",
            Self::ConfigMissing => "Missing configuration",
            Self::InternalError => "Internal error",
            Self::DatabaseError => "Database error",
            Self::SerializationError => "Serialization error",
        }
    }
}

/// Who and what an error concerns, plus free-form details for the response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Dietitian the request ran as
    pub user_id: Option<String>,
    /// Client, plan or usage document involved
    pub resource_id: Option<String>,
    /// Extra JSON surfaced to the caller as `error.details`
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            user_id: None,
            resource_id: None,
            details: serde_json::Value::Null,
        }
    }
}

/// Service-wide error
#[derive(Debug, Error)]
pub struct AppError {
    /// Category
    pub code: ErrorCode,
    /// Message safe to show the caller
    pub message: String,
    /// Identity and details
    pub context: ErrorContext,
    /// Underlying cause, kept for logs
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Error with empty context
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Record the dietitian involved
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.context.user_id = Some(user_id.into());
        self
    }

    /// Record the document involved
    #[must_use]
    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.context.resource_id = Some(id.into());
        self
    }

    /// Attach JSON returned as `error.details`
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Chain the underlying cause
    #[must_use]
    pub fn with_source(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(cause));
        self
    }

    /// Shorthand for `self.code.http_status()`
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// `Result` with [`AppError`]
pub type AppResult<T> = Result<T, AppError>;

/// JSON body for every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorBody,
}

/// Inner object of an [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error code
    pub code: ErrorCode,
    /// User-facing message
    pub message: String,
    /// Optional diagnostic details
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self {
            error: ErrorBody {
                code: err.code,
                message: err.message,
                details: err.context.details,
            },
        }
    }
}

// Constructors for the common cases
impl AppError {
    /// No caller identity
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "User authentication required")
    }

    /// `"{what} not found"`
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceNotFound, format!("{} not found", what.into()))
    }

    /// Unacceptable field value
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Absent or blank field
    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingRequiredField, message)
    }

    /// Unexpected server fault
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// SQLite failure
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Unusable setting
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Provider failure, prefixed with the provider name
    pub fn external_service(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", provider.into(), message.into()),
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::not_found("Record"),
            other => Self::database(other.to_string()).with_source(other),
        }
    }
}

#[cfg(feature = "http-response")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = http::StatusCode::from_u16(self.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(code = ?self.code, error = %self, "Request failed");
        } else {
            tracing::debug!(code = ?self.code, error = %self, "Request rejected");
        }

        (status, axum::Json(ErrorResponse::from(self))).into_response()
    }
}
