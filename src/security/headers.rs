//! CORS response headers.
//!
//! Browsers call the gateway cross-origin from the marketing UI, so every
//! response (success, failure, preflight, middleware-generated) carries the
//! same permissive headers.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// The three CORS headers as (name, value) pairs.
pub fn cors_headers() -> [(HeaderName, HeaderValue); 3] {
    [
        (ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN)),
        (ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS)),
        (ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS)),
    ]
}

/// Set the CORS headers, replacing any existing values.
pub fn apply_cors(headers: &mut HeaderMap) {
    for (name, value) in cors_headers() {
        headers.insert(name, value);
    }
}

/// True when all three headers are present with the expected values.
pub fn has_cors(headers: &HeaderMap) -> bool {
    cors_headers()
        .iter()
        .all(|(name, value)| headers.get(name) == Some(value))
}
