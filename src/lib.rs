//! Stateless proxy gateway for third-party content APIs.
//!
//! Three fixed upstream integrations (GitHub OAuth code exchange, audio
//! transcription, video generation) behind one response contract: a JSON
//! envelope with CORS headers on every response.

pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod multipart;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::GatewayConfig;
pub use gateway::{Gateway, InboundRequest, Route};
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
