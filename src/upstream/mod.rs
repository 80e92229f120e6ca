//! Upstream client subsystem.
//!
//! # Data Flow
//! ```text
//! gateway route (validated input, secret, encoded payload)
//!     → client.rs (one reqwest call, bearer/JSON/multipart)
//!     → types.rs (UpstreamResponse: status + raw body)
//!              or (UpstreamError::Transport on network failure)
//!     → gateway route interprets the provider-specific shape
//! ```
//!
//! # Design Decisions
//! - A transport failure is an `Err`, an upstream error status is an `Ok`
//!   response; the route decides what the latter means
//! - No retries, no rate limiting, no per-call timeout override

pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::{Upstream, UpstreamError, UpstreamResponse};
