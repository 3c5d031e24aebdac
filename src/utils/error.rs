use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Every failure a poll operation can surface. Each variant maps to a
/// stable code and HTTP status; raw storage detail never leaves the
/// process (it is logged server-side and replaced with a generic message).
#[derive(Debug)]
pub enum AppError {
    ValidationFailed(Vec<String>),
    AuthRequired,
    AuthError(String),
    PermissionDenied,
    PollNotFound,
    OptionNotFound,
    PollPrivate,
    PollExpired,
    AlreadyVoted,
    Duplicate,
    DatabaseError(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationFailed(_) => "VALIDATION_FAILED",
            AppError::AuthRequired => "AUTH_REQUIRED",
            AppError::AuthError(_) => "AUTH_ERROR",
            AppError::PermissionDenied => "PERMISSION_DENIED",
            AppError::PollNotFound => "POLL_NOT_FOUND",
            AppError::OptionNotFound => "OPTION_NOT_FOUND",
            AppError::PollPrivate => "POLL_PRIVATE",
            AppError::PollExpired => "POLL_EXPIRED",
            AppError::AlreadyVoted => "ALREADY_VOTED",
            AppError::Duplicate => "DUPLICATE",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationFailed(_)
            | AppError::PollPrivate
            | AppError::PollExpired
            | AppError::AlreadyVoted => StatusCode::BAD_REQUEST,
            AppError::AuthRequired | AppError::AuthError(_) => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied => StatusCode::FORBIDDEN,
            AppError::PollNotFound | AppError::OptionNotFound => StatusCode::NOT_FOUND,
            AppError::Duplicate => StatusCode::CONFLICT,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AppError::ValidationFailed(errors) => errors.join(", "),
            AppError::AuthRequired => "Authentication required".to_string(),
            AppError::AuthError(msg) => msg.clone(),
            AppError::PermissionDenied => {
                "You do not have permission to perform this action".to_string()
            }
            AppError::PollNotFound => "Poll not found".to_string(),
            AppError::OptionNotFound => "Option not found".to_string(),
            AppError::PollPrivate => "This poll is not public".to_string(),
            AppError::PollExpired => "Poll has expired".to_string(),
            AppError::AlreadyVoted => "You have already voted on this poll".to_string(),
            AppError::Duplicate => "Resource already exists".to_string(),
            AppError::DatabaseError(_) => "Database operation failed".to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::DatabaseError(detail) = &self {
            error!("database error: {detail}");
        }

        let body = ErrorResponse {
            error: self.code().to_string(),
            message: self.message(),
            details: None,
        };

        (self.status_code(), Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Duplicate-key write rejections (E11000) come from the partial unique
/// vote index and get their own taxonomy entry.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_err)) => write_err.code == 11000,
        _ => false,
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            AppError::Duplicate
        } else {
            AppError::DatabaseError(err.to_string())
        }
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::DatabaseError(format!("bson serialization failed: {err}"))
    }
}
