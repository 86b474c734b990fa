//! Error types and response handling for the proxy host.
//!
//! Provides structured error classification, HTTP status code mapping,
//! and JSON error response generation.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::maintenance::MaintenanceError;

/// Errors that can occur while building or running the proxy.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The maintenance interceptor could not be built
    #[error("Maintenance setup failed: {0}")]
    Maintenance(#[from] MaintenanceError),

    /// Failed to connect to the upstream server
    #[error("Connection failed to '{upstream}': {source}")]
    ConnectionError {
        upstream: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded total timeout
    #[error("Request timeout after {duration}s")]
    RequestTimeout { duration: u64 },

    /// Invalid request format or parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// HTTP error from response building
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<axum::http::Error> for ProxyError {
    fn from(err: axum::http::Error) -> Self {
        ProxyError::Http(err.to_string())
    }
}

impl ProxyError {
    /// Map error variant to appropriate HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Maintenance(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::ConnectionError { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::RequestTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error type string for JSON responses
    pub fn error_type(&self) -> &'static str {
        match self {
            ProxyError::Maintenance(_) => "maintenance_error",
            ProxyError::ConnectionError { .. } => "connection_error",
            ProxyError::RequestTimeout { .. } => "request_timeout",
            ProxyError::InvalidRequest(_) => "invalid_request",
            ProxyError::Internal(_) => "internal_error",
            ProxyError::Http(_) => "http_error",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "type": self.error_type(),
                "message": self.to_string(),
            }
        });

        let mut response = Response::new(Body::from(body.to_string()));
        *response.status_mut() = self.status_code();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}
