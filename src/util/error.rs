use axum::{response::{IntoResponse, Response}, http::StatusCode};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum HandlerErrorKind {
    NotFound,
    Validation,
    Internal,
    BadRequest,
}

impl std::fmt::Display for HandlerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HandlerErrorKind::NotFound => "NotFound",
            HandlerErrorKind::Validation => "Validation",
            HandlerErrorKind::Internal => "Internal",
            HandlerErrorKind::BadRequest => "BadRequest",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Serialize)]
pub struct HandlerError {
    pub error: HandlerErrorKind,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerError {
    pub fn new(error: HandlerErrorKind, message: impl Into<String>) -> Self {
        HandlerError {
            error,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match self.error {
            HandlerErrorKind::NotFound => StatusCode::NOT_FOUND,
            HandlerErrorKind::Validation | HandlerErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            HandlerErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = axum::Json(self);
        (status, body).into_response()
    }
}

impl From<ServiceError> for HandlerError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(msg) => HandlerError::new(HandlerErrorKind::Validation, msg),
            ServiceError::NotConfigured(msg) => HandlerError::new(HandlerErrorKind::Internal, msg),
            ServiceError::Upstream { message, details } => {
                let err = HandlerError::new(HandlerErrorKind::Internal, message);
                match details {
                    Some(details) => err.with_details(details),
                    None => err,
                }
            }
            ServiceError::InternalError(msg) => HandlerError::new(HandlerErrorKind::Internal, msg),
        }
    }
}


#[derive(Debug, Clone)]
pub enum ServiceError {
    InvalidInput(String),
    NotConfigured(String),
    /// An upstream API answered but refused the request.
    Upstream {
        message: String,
        details: Option<serde_json::Value>,
    },
    InternalError(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::InvalidInput(msg) => write!(f, "Invalid Input: {}", msg),
            ServiceError::NotConfigured(msg) => write!(f, "Not Configured: {}", msg),
            ServiceError::Upstream { message, .. } => write!(f, "Upstream Error: {}", message),
            ServiceError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}
