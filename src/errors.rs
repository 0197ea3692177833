//! Application error taxonomy and HTTP mapping.
//!
//! Every failure a handler can produce is an [`AppError`]. The client
//! payload carries a machine-readable `code`, a human-readable
//! `message`, and optionally a list of field errors; driver and token
//! internals are logged but never serialized into a response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or unusable bearer token.
    #[error("Authentication required")]
    Unauthorized,

    /// Authenticated, existence acknowledged, access denied.
    #[error("Access denied")]
    Forbidden,

    /// Login rejected; deliberately silent on which part was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Absent, or concealed from this caller.
    #[error("Resource not found")]
    NotFound,

    /// Unique-field collision; the payload names the field.
    #[error("{0} already in use")]
    Conflict(String),

    /// One entry per failing request field.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Internal server error")]
    Internal(String),
}

/// One field/message pair in a validation or conflict payload.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredentials | Self::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Jwt(_) => "AUTH_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Client-safe message. Infrastructure detail stays in the logs.
    fn public_message(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Database(e) => {
                tracing::error!(error = ?e, "database failure");
                "A database error occurred".into()
            }
            Self::Jwt(e) => {
                // Signature, parse, and expiry failures are indistinguishable
                // to the caller.
                tracing::warn!(error = ?e, "token verification failed");
                "Invalid or expired token".into()
            }
            Self::Internal(msg) => {
                tracing::error!(%msg, "internal failure");
                "An internal error occurred".into()
            }
            other => other.to_string(),
        }
    }

    fn field_errors(&self) -> Option<Vec<FieldError>> {
        match self {
            Self::Validation(fields) => Some(fields.clone()),
            Self::Conflict(field) => {
                let message = format!("{} already in use", field);
                Some(vec![FieldError::new(field.clone(), message)])
            }
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let envelope = ErrorEnvelope {
            error: ErrorDetail {
                code: self.code(),
                message: self.public_message(),
                fields: self.field_errors(),
            },
        };

        (self.status(), Json(envelope)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// `Option` lookups that should read as "absent means NotFound".
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

impl AppError {
    pub fn conflict(field: impl Into<String>) -> Self {
        Self::Conflict(field.into())
    }

    pub fn validation(fields: Vec<FieldError>) -> Self {
        Self::Validation(fields)
    }

    pub fn validation_single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
