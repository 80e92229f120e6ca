//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Every outgoing response:
//!     → headers.rs (CORS headers, always)
//! ```
//!
//! Body size limits are enforced by the server's extractor limit; secret
//! redaction lives with the configuration (`config::secret`).

pub mod headers;

pub use headers::{apply_cors, cors_headers, has_cors};
