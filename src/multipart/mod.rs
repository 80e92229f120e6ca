//! Multipart encoding subsystem.
//!
//! # Data Flow
//! ```text
//! decoded client payload (bytes) + fixed text fields
//!     → field.rs (typed MultipartField values, ordered)
//!     → encoder.rs (boundary selection, collision check, serialization)
//!     → EncodedBody (bytes + boundary → Content-Type header)
//!     → upstream client
//! ```
//!
//! # Design Decisions
//! - Pure transform: no I/O, no shared state
//! - Produces the full wire body up front; the upstream client sends it as-is
//! - Generated boundaries are checked against field content and regenerated
//!   on collision; caller-supplied ones fail loudly instead

pub mod encoder;
pub mod field;

pub use encoder::{generate_boundary, EncodedBody, MultipartError, MultipartForm, BOUNDARY_PREFIX};
pub use field::MultipartField;
