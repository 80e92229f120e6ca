//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the three gateway routes and a liveness probe
//! - Wire up middleware (tracing, request ID, CORS, body limit)
//! - Answer by method first, then read the body under the request deadline
//!   and hand an `InboundRequest` to the gateway
//! - Serve with graceful shutdown

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, FromRequest, State},
    http::{header, HeaderValue, Method, Request, StatusCode},
    routing::{any, get},
    Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::gateway::{Gateway, InboundRequest, Route};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::{GatewayError, GatewayResponse};
use crate::lifecycle::shutdown;
use crate::security::headers::{ALLOW_HEADERS, ALLOW_METHODS, ALLOW_ORIGIN};
use crate::upstream::{UpstreamClient, UpstreamError};

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl GatewayServer {
    /// Create a server with a fresh upstream client.
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        Ok(Self::with_client(config, UpstreamClient::new()?))
    }

    fn with_client(config: GatewayConfig, client: UpstreamClient) -> Self {
        let config = Arc::new(config);
        let gateway = Gateway::new(config.clone(), client);
        let router = Self::build_router(&config, gateway);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, gateway: Gateway) -> Router {
        let mut router: Router<Gateway> = Router::new();
        for route in Route::ALL {
            router = router.route(
                route.path(),
                any(
                    move |State(gateway): State<Gateway>, request: Request<Body>| async move {
                        dispatch(gateway, route, request).await
                    },
                ),
            );
        }

        let middleware = ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static(ALLOW_ORIGIN),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOW_HEADERS),
            ))
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request),
                )
            }))
            .layer(propagate_request_id_layer());

        router
            .route(
                "/health",
                get(health).options(preflight).fallback(method_not_allowed),
            )
            .fallback(not_found)
            .with_state(gateway)
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(middleware)
    }

    /// The fully layered router, for in-process use (tests, embedding).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn dispatch(gateway: Gateway, route: Route, request: Request<Body>) -> GatewayResponse {
    // Preflight and unsupported methods never read the body.
    if *request.method() != Method::POST {
        let (parts, _) = request.into_parts();
        return gateway
            .handle(
                route,
                InboundRequest {
                    method: parts.method,
                    headers: parts.headers,
                    body: Bytes::new(),
                },
            )
            .await;
    }

    let headers = request.headers().clone();
    let read = Bytes::from_request(request, &());
    let body = match tokio::time::timeout(gateway.request_timeout(), read).await {
        Ok(Ok(body)) => body,
        Ok(Err(rejection)) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return gateway.reject(route, GatewayError::PayloadTooLarge);
        }
        Ok(Err(rejection)) => {
            tracing::debug!(error = %rejection, "Failed to read request body");
            return gateway.reject(route, GatewayError::InvalidInput("Invalid request body"));
        }
        Err(_) => return gateway.reject(route, GatewayError::Timeout),
    };

    gateway
        .handle(
            route,
            InboundRequest {
                method: Method::POST,
                headers,
                body,
            },
        )
        .await
}

async fn health() -> GatewayResponse {
    GatewayResponse::json(
        StatusCode::OK,
        json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }),
    )
}

async fn preflight() -> GatewayResponse {
    GatewayResponse::preflight()
}

async fn method_not_allowed() -> GatewayResponse {
    GatewayResponse::from_error("health", GatewayError::MethodNotAllowed)
}

async fn not_found() -> GatewayResponse {
    GatewayResponse::from_error("unknown", GatewayError::NotFound)
}
