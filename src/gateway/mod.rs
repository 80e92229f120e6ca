//! Request gateway: one stateless pass per inbound call.
//!
//! # Data Flow
//! ```text
//! ReceivingRequest   InboundRequest { method, headers, body }
//!     → ValidatingInput   method, JSON body, required field, configuration
//!     → BuildingPayload   base64 decode + multipart / JSON payload
//!     → CallingUpstream   exactly one UpstreamClient call
//!     → Normalizing       Result<Success, GatewayError> → envelope + status
//!     → Responding        GatewayResponse (always, on every path)
//! ```
//!
//! Early exits from `ValidatingInput` and `CallingUpstream` jump straight to
//! `Normalizing`. Nothing survives between requests; the only shared state
//! is the immutable configuration and the HTTP client.

pub mod oauth;
pub mod transcribe;
pub mod video;

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use serde::de::DeserializeOwned;

use crate::config::GatewayConfig;
use crate::http::response::{normalize, GatewayError, GatewayResponse};
use crate::observability::metrics;
use crate::upstream::UpstreamClient;

pub use oauth::TokenGrant;
pub use transcribe::Transcript;
pub use video::VideoGeneration;

/// The fixed set of proxied endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    GitHubOAuth,
    Transcribe,
    GenerateVideo,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::GitHubOAuth, Route::Transcribe, Route::GenerateVideo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitHubOAuth => "github_oauth",
            Self::Transcribe => "transcribe",
            Self::GenerateVideo => "generate_video",
        }
    }

    /// HTTP path the route is mounted on.
    pub fn path(&self) -> &'static str {
        match self {
            Self::GitHubOAuth => "/api/github-oauth",
            Self::Transcribe => "/api/transcribe",
            Self::GenerateVideo => "/api/generate-video",
        }
    }
}

/// An inbound call as received. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    pub fn new(method: Method, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Deserialize the JSON body. An empty body reads as `{}`.
    pub(crate) fn json_body<T>(&self) -> Result<T, GatewayError>
    where
        T: DeserializeOwned + Default,
    {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        serde_json::from_slice(&self.body).map_err(|e| {
            tracing::debug!(error = %e, "Rejecting malformed JSON body");
            GatewayError::InvalidInput("Invalid JSON body")
        })
    }
}

/// Composes validation, payload building, the upstream call, and
/// normalization for each route.
#[derive(Debug, Clone)]
pub struct Gateway {
    config: Arc<GatewayConfig>,
    client: UpstreamClient,
}

impl Gateway {
    pub fn new(config: Arc<GatewayConfig>, client: UpstreamClient) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub(crate) fn client(&self) -> &UpstreamClient {
        &self.client
    }

    /// Deadline for one inbound request, including its upstream call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeouts.request_secs)
    }

    /// Run one request through the route's state machine. Never fails: every
    /// path ends in a `GatewayResponse`.
    pub async fn handle(&self, route: Route, request: InboundRequest) -> GatewayResponse {
        let start = Instant::now();

        let response = match request.method {
            Method::OPTIONS => GatewayResponse::preflight(),
            Method::POST => {
                match tokio::time::timeout(self.request_timeout(), self.run(route, &request)).await
                {
                    Ok(response) => response,
                    Err(_) => GatewayResponse::from_error(route.as_str(), GatewayError::Timeout),
                }
            }
            _ => GatewayResponse::from_error(route.as_str(), GatewayError::MethodNotAllowed),
        };

        self.finish(route, start, response)
    }

    /// Answer a POST whose body never became an `InboundRequest`.
    pub fn reject(&self, route: Route, error: GatewayError) -> GatewayResponse {
        let start = Instant::now();
        self.finish(route, start, GatewayResponse::from_error(route.as_str(), error))
    }

    async fn run(&self, route: Route, request: &InboundRequest) -> GatewayResponse {
        match route {
            Route::GitHubOAuth => normalize(route.as_str(), self.exchange_oauth_code(request).await),
            Route::Transcribe => normalize(route.as_str(), self.transcribe(request).await),
            Route::GenerateVideo => normalize(route.as_str(), self.generate_video(request).await),
        }
    }

    fn finish(&self, route: Route, start: Instant, response: GatewayResponse) -> GatewayResponse {
        metrics::record_request(route.as_str(), response.status.as_u16(), start);
        tracing::debug!(
            route = route.as_str(),
            status = response.status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request handled"
        );
        response
    }
}

/// Trimmed, non-empty string field.
pub(crate) fn required<'a>(value: &'a Option<String>, missing: &'static str) -> Result<&'a str, GatewayError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(GatewayError::MissingField(missing))
}
