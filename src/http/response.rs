//! Response normalization.
//!
//! # Responsibilities
//! - Map every route outcome to one JSON envelope and status code
//! - Attach CORS headers to every response, including preflight
//! - Log failures server-side with their original cause
//!
//! # Design Decisions
//! - `GatewayError::status` is the only place error kinds become status codes
//! - Client-visible failures are always `{ "error": string }` (plus
//!   `details` where the upstream text is useful to the caller)
//! - Transport causes are logged, never serialized

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::security::headers::apply_cors;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every way a gateway route can fail.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required field is absent or empty.
    #[error("{0}")]
    MissingField(&'static str),

    /// The body or a field could not be understood.
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("Request body too large")]
    PayloadTooLarge,

    /// The upstream's secret is not configured.
    #[error("{0}")]
    NotConfigured(&'static str),

    /// The upstream understood the request and refused it.
    #[error("{message}")]
    UpstreamRejected {
        status: StatusCode,
        message: String,
        details: Option<String>,
    },

    /// Network failure, or an upstream answer that could not be interpreted.
    #[error("{message}")]
    Transport {
        message: &'static str,
        #[source]
        source: BoxError,
    },

    /// The upstream payload could not be assembled from valid input.
    #[error("{message}")]
    PayloadBuild {
        message: &'static str,
        #[source]
        source: BoxError,
    },

    /// The request did not complete within the configured deadline.
    #[error("Request timed out")]
    Timeout,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    NotFound,
}

impl GatewayError {
    pub fn transport(message: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            message,
            source: source.into(),
        }
    }

    pub fn payload_build(message: &'static str, source: impl Into<BoxError>) -> Self {
        Self::PayloadBuild {
            message,
            source: source.into(),
        }
    }

    /// An upstream refusal. Upstream 5xx answers become 500, anything else
    /// (4xx, or a 2xx carrying an error payload) becomes 400.
    pub fn rejected(
        upstream_status: StatusCode,
        message: impl Into<String>,
        details: Option<String>,
    ) -> Self {
        let status = if upstream_status.is_server_error() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::BAD_REQUEST
        };
        Self::UpstreamRejected {
            status,
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingField(_) | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotConfigured(_) | Self::Transport { .. } | Self::PayloadBuild { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::UpstreamRejected { status, .. } => *status,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// The JSON body the caller sees.
    pub fn body(&self) -> Value {
        match self {
            Self::UpstreamRejected {
                message,
                details: Some(details),
                ..
            } => json!({ "error": message, "details": details }),
            other => json!({ "error": other.to_string() }),
        }
    }

    fn log(&self, route: &'static str) {
        let status = self.status().as_u16();
        match self {
            Self::Transport { message, source } => {
                tracing::error!(route, status, reason = *message, error = %source, "Upstream unreachable");
            }
            Self::PayloadBuild { message, source } => {
                tracing::error!(route, status, reason = *message, error = %source, "Failed to build upstream payload");
            }
            Self::Timeout => {
                tracing::error!(route, status, "Request deadline elapsed");
            }
            Self::UpstreamRejected { status: mapped, .. } if mapped.is_server_error() => {
                tracing::error!(route, status, error = %self, "Upstream returned server error");
            }
            Self::UpstreamRejected { .. } => {
                tracing::warn!(route, status, error = %self, "Upstream rejected request");
            }
            Self::NotConfigured(_) => {
                tracing::error!(route, status, error = %self, "Upstream not configured");
            }
            _ => tracing::info!(route, status, error = %self, "Request rejected"),
        }
    }
}

/// The only externally observable artifact of a request.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// `None` means an empty body (preflight).
    pub body: Option<Value>,
}

impl GatewayResponse {
    /// A JSON response with CORS headers.
    pub fn json(status: StatusCode, body: Value) -> Self {
        let mut headers = HeaderMap::new();
        apply_cors(&mut headers);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Self {
            status,
            headers,
            body: Some(body),
        }
    }

    /// `OPTIONS` short-circuit: 200, CORS headers, no body.
    pub fn preflight() -> Self {
        let mut headers = HeaderMap::new();
        apply_cors(&mut headers);
        Self {
            status: StatusCode::OK,
            headers,
            body: None,
        }
    }

    /// 200 with a route's success shape.
    pub fn success<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self::json(StatusCode::OK, body),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize success body");
                Self::json(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        }
    }

    pub fn from_error(route: &'static str, error: GatewayError) -> Self {
        error.log(route);
        Self::json(error.status(), error.body())
    }
}

/// Convert a route's result into the response envelope.
pub fn normalize<T: Serialize>(
    route: &'static str,
    result: Result<T, GatewayError>,
) -> GatewayResponse {
    match result {
        Ok(success) => GatewayResponse::success(&success),
        Err(error) => GatewayResponse::from_error(route, error),
    }
}

impl IntoResponse for GatewayResponse {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, self.headers, Json(body)).into_response(),
            None => (self.status, self.headers).into_response(),
        }
    }
}
