//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overlay for secrets)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc with the gateway
//! ```
//!
//! # Design Decisions
//! - Loaded once at process start; never mutated or reloaded afterwards
//! - All fields have defaults to allow minimal configs
//! - Secrets are wrapped in `Sensitive` so they cannot leak through Debug

pub mod loader;
pub mod schema;
pub mod secret;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::GatewayConfig;
pub use schema::{
    GitHubOAuthConfig, ListenerConfig, LogFormat, ObservabilityConfig, SecurityConfig,
    TimeoutConfig, TranscriptionConfig, VideoGenerationConfig,
};
pub use secret::Sensitive;
