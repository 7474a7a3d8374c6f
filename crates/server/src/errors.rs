use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;

/// Which key an endpoint uses for its error body: `{"error": ..}` or `{"message": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKey {
    Error,
    Message,
}

impl BodyKey {
    fn as_str(self) -> &'static str {
        match self {
            BodyKey::Error => "error",
            BodyKey::Message => "message",
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub key: BodyKey,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, key: BodyKey, message: impl Into<String>) -> Self {
        Self { status, key, message: message.into() }
    }

    pub fn method_not_allowed(key: BodyKey) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, key, "Method not allowed")
    }

    /// Map a service failure. `not_found_key` is the 404 body shape of the
    /// calling endpoint; validation and storage errors always use `error`.
    pub fn from_service(err: ServiceError, not_found_key: BodyKey) -> Self {
        match err {
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, BodyKey::Error, msg),
            ServiceError::Model(e) => Self::new(StatusCode::BAD_REQUEST, BodyKey::Error, e.to_string()),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, not_found_key, msg),
            ServiceError::StorageRead(_) | ServiceError::StorageWrite(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, BodyKey::Error, "Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::Map::new();
        body.insert(self.key.as_str().to_string(), serde_json::Value::String(self.message));
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
