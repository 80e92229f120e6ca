//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files;
//! secrets are additionally overlaid from the environment by the loader.

use serde::Deserialize;

use crate::config::secret::Sensitive;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request hardening.
    pub security: SecurityConfig,

    /// GitHub OAuth code exchange upstream.
    pub github: GitHubOAuthConfig,

    /// Audio transcription upstream.
    pub transcription: TranscriptionConfig,

    /// Video generation upstream.
    pub video: VideoGenerationConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
///
/// Only the inbound request is bounded. Upstream calls run under the HTTP
/// client's defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for one inbound request, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error), used when RUST_LOG is unset.
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum inbound body size in bytes. Audio arrives base64-encoded, so
    /// this has to leave room for ~4/3 of the largest accepted recording.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 32 * 1024 * 1024, // 32MB
        }
    }
}

/// GitHub OAuth application credentials and token endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubOAuthConfig {
    /// OAuth App client id (env: GITHUB_CLIENT_ID).
    pub client_id: Option<Sensitive<String>>,

    /// OAuth App client secret (env: GITHUB_CLIENT_SECRET).
    pub client_secret: Option<Sensitive<String>>,

    /// Token exchange endpoint.
    pub token_url: String,
}

impl GitHubOAuthConfig {
    /// Both credentials, or `None` when the exchange cannot be performed.
    pub fn credentials(&self) -> Option<(&Sensitive<String>, &Sensitive<String>)> {
        self.client_id.as_ref().zip(self.client_secret.as_ref())
    }
}

impl Default for GitHubOAuthConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            token_url: "https://github.com/login/oauth/access_token".to_string(),
        }
    }
}

/// Whisper-compatible transcription upstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Bearer key (env: OPENAI_API_KEY).
    pub api_key: Option<Sensitive<String>>,

    /// Transcription endpoint.
    pub endpoint: String,

    /// Value of the `model` form field.
    pub model: String,

    /// Value of the `language` form field.
    pub language: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.openai.com/v1/audio/transcriptions".to_string(),
            model: "whisper-1".to_string(),
            language: "en".to_string(),
        }
    }
}

/// Text-to-video generation upstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VideoGenerationConfig {
    /// Bearer key (env: VIDEO_API_KEY).
    pub api_key: Option<Sensitive<String>>,

    /// Generation endpoint.
    pub endpoint: String,
}

impl Default for VideoGenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.lumalabs.ai/dream-machine/v1/generations".to_string(),
        }
    }
}
