//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, body extraction)
//!     → request.rs (request ID assigned, attached to trace span)
//!     → gateway (validate → upstream → normalize)
//!     → response.rs (envelope, status, CORS headers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{normalize, GatewayError, GatewayResponse};
pub use server::GatewayServer;
