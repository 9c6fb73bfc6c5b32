use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum OrreryError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(String),

    #[error("mail transport error: {0}")]
    MailTransport(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("password hash error: {0}")]
    PasswordHash(String),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("database error: {0}")]
    Database(#[from] SqlxError),
}

impl IntoResponse for OrreryError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            OrreryError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message,
                },
            ),
            OrreryError::Conflict(message) => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "CONFLICT".to_string(),
                    message,
                },
            ),
            OrreryError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "UNAUTHORIZED".to_string(),
                    message,
                },
            ),
            OrreryError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "VALIDATION".to_string(),
                    message,
                },
            ),
            OrreryError::MailTransport(ref reason) => {
                error!(error = %reason, "mail dispatch failed");
                (
                    StatusCode::BAD_GATEWAY,
                    ApiErrorBody {
                        code: "MAIL_TRANSPORT".to_string(),
                        message: "Notification mail could not be dispatched.".to_string(),
                    },
                )
            }
            internal @ (OrreryError::Database(_)
            | OrreryError::Token(_)
            | OrreryError::PasswordHash(_)
            | OrreryError::Config(_)) => {
                error!(error = %internal, "internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
