//! Outbound HTTP client for the fixed upstream integrations.

use std::time::Instant;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::RequestBuilder;
use serde::Serialize;

use crate::config::Sensitive;
use crate::multipart::EncodedBody;
use crate::observability::metrics;
use crate::upstream::types::{Upstream, UpstreamError, UpstreamResponse};

const USER_AGENT: &str = concat!("content-gateway/", env!("CARGO_PKG_VERSION"));

/// Issues exactly one request per call. No retries, no timeout beyond the
/// reqwest defaults.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
}

impl UpstreamClient {
    pub fn new() -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(UpstreamError::Client)?;
        Ok(Self { http })
    }

    /// POST a JSON payload, asking for a JSON answer.
    pub async fn post_json<T>(
        &self,
        upstream: Upstream,
        url: &str,
        bearer: Option<&Sensitive<String>>,
        payload: &T,
    ) -> Result<UpstreamResponse, UpstreamError>
    where
        T: Serialize + ?Sized,
    {
        let mut request = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .json(payload);
        if let Some(token) = bearer {
            request = request.bearer_auth(token.expose());
        }
        self.send(upstream, request).await
    }

    /// POST an encoded multipart body with bearer authentication.
    pub async fn post_multipart(
        &self,
        upstream: Upstream,
        url: &str,
        bearer: &Sensitive<String>,
        body: EncodedBody,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let request = self
            .http
            .post(url)
            .bearer_auth(bearer.expose())
            .header(CONTENT_TYPE, body.content_type())
            .body(body.into_bytes());
        self.send(upstream, request).await
    }

    async fn send(
        &self,
        upstream: Upstream,
        request: RequestBuilder,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let start = Instant::now();

        let result = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        }
        .await;

        match result {
            Ok((status, body)) => {
                let response = UpstreamResponse {
                    upstream,
                    status,
                    body,
                };
                metrics::record_upstream_call(upstream.as_str(), response.outcome(), start);
                tracing::debug!(
                    upstream = %upstream,
                    status = %status,
                    bytes = response.body.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream responded"
                );
                Ok(response)
            }
            Err(source) => {
                metrics::record_upstream_call(upstream.as_str(), "transport_error", start);
                Err(UpstreamError::Transport { upstream, source })
            }
        }
    }
}
