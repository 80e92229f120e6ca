//! Upstream identities, raw responses, and error definitions.

use axum::body::Bytes;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;

/// The three third-party APIs the gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    GitHubOAuth,
    Transcription,
    VideoGeneration,
}

impl Upstream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitHubOAuth => "github_oauth",
            Self::Transcription => "transcription",
            Self::VideoGeneration => "video_generation",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while talking to an upstream.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    /// Connect, send, or body read failed before a full response arrived.
    #[error("request to {upstream} failed: {source}")]
    Transport {
        upstream: Upstream,
        #[source]
        source: reqwest::Error,
    },

    /// A response arrived but its body did not have the expected shape.
    #[error("{upstream} returned an undecodable body: {source}")]
    Decode {
        upstream: Upstream,
        #[source]
        source: serde_json::Error,
    },
}

/// A complete upstream response. Only produced when the transport call
/// succeeded; the upstream's own success/error semantics live in `status`
/// and `body`.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub upstream: Upstream,
    pub status: StatusCode,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, UpstreamError> {
        serde_json::from_slice(&self.body).map_err(|source| UpstreamError::Decode {
            upstream: self.upstream,
            source,
        })
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Metrics label for how the call ended.
    pub fn outcome(&self) -> &'static str {
        if self.status.is_success() {
            "success"
        } else if self.status.is_server_error() {
            "server_error"
        } else {
            "client_error"
        }
    }
}
