use axum::{response::{IntoResponse, Response}, http::StatusCode};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerErrorKind {
    NotFound,
    BadRequest,
    Internal,
}

impl std::fmt::Display for HandlerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HandlerErrorKind::NotFound => "NotFound",
            HandlerErrorKind::BadRequest => "BadRequest",
            HandlerErrorKind::Internal => "Internal",
        };
        write!(f, "{}", s)
    }
}

/// Error response for every route: the HTTP status carries the error class,
/// the body is a single informational `error` string.
#[derive(Debug, Serialize)]
pub struct HandlerError {
    #[serde(skip)]
    pub kind: HandlerErrorKind,
    pub error: String,
}

impl HandlerError {
    pub fn not_found<T: Into<String>>(message: T) -> Self {
        HandlerError { kind: HandlerErrorKind::NotFound, error: message.into() }
    }

    pub fn bad_request<T: Into<String>>(message: T) -> Self {
        HandlerError { kind: HandlerErrorKind::BadRequest, error: message.into() }
    }

    pub fn internal<T: Into<String>>(message: T) -> Self {
        HandlerError { kind: HandlerErrorKind::Internal, error: message.into() }
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.error)
    }
}

impl std::error::Error for HandlerError {}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match self.kind {
            HandlerErrorKind::NotFound => StatusCode::NOT_FOUND,
            HandlerErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            HandlerErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = axum::Json(self);
        (status, body).into_response()
    }
}

#[derive(Debug, Clone)]
pub enum ServiceError {
    NotFound(String),
    InvalidInput(String),
    InternalError(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ServiceError::InvalidInput(msg) => write!(f, "Invalid Input: {}", msg),
            ServiceError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

// Allow conversion from RepositoryError to ServiceError
impl From<crate::repository::repository_error::RepositoryError> for ServiceError {
    fn from(err: crate::repository::repository_error::RepositoryError) -> Self {
        use crate::repository::repository_error::RepositoryError;
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::ValidationError(msg) => ServiceError::InvalidInput(msg),
            RepositoryError::DatabaseError(msg) => ServiceError::InternalError(msg),
            RepositoryError::ConnectionError(msg) => ServiceError::InternalError(msg),
            RepositoryError::Generic(e) => ServiceError::InternalError(e.to_string()),
        }
    }
}

// Any storage failure, uniqueness violations included, surfaces as a 500
// carrying the raw store message.
impl From<ServiceError> for HandlerError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => HandlerError::not_found(msg),
            ServiceError::InvalidInput(msg) => HandlerError::bad_request(msg),
            ServiceError::InternalError(msg) => {
                HandlerError::internal(format!("Database error: {}", msg))
            }
        }
    }
}
