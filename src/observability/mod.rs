//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! gateway + upstream client produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - Upstream failures are logged with the original error; clients only
//!   ever see the normalized message
//! - Secrets are never logged (they are `Sensitive` in config)

pub mod logging;
pub mod metrics;
