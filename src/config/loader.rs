//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::secret::Sensitive;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_GITHUB_CLIENT_ID: &str = "GITHUB_CLIENT_ID";
pub const ENV_GITHUB_CLIENT_SECRET: &str = "GITHUB_CLIENT_SECRET";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_VIDEO_API_KEY: &str = "VIDEO_API_KEY";
pub const ENV_BIND_ADDRESS: &str = "GATEWAY_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration once at startup.
///
/// Reads the TOML file when a path is given (defaults otherwise), overlays
/// secrets from the process environment, then validates the result.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => GatewayConfig::default(),
    };
    finalize(config, |key| std::env::var(key).ok())
}

/// Parse configuration text without touching the environment.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Apply the environment overlay and validate.
pub fn finalize<F>(mut config: GatewayConfig, env: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    drop_blank_secrets(&mut config);
    apply_env_overrides(&mut config, env);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// A secret written as `""` in the file counts as unset, same as a blank
/// environment variable.
fn drop_blank_secrets(config: &mut GatewayConfig) {
    let slots = [
        &mut config.github.client_id,
        &mut config.github.client_secret,
        &mut config.transcription.api_key,
        &mut config.video.api_key,
    ];
    for slot in slots {
        if slot.as_ref().is_some_and(|s| s.expose().trim().is_empty()) {
            *slot = None;
        }
    }
}

/// Overlay environment values on top of file values. Blank variables are
/// treated as unset so an exported-but-empty key does not count as configured.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let secret = |key: &str| env(key).and_then(Sensitive::non_empty);

    if let Some(value) = secret(ENV_GITHUB_CLIENT_ID) {
        config.github.client_id = Some(value);
    }
    if let Some(value) = secret(ENV_GITHUB_CLIENT_SECRET) {
        config.github.client_secret = Some(value);
    }
    if let Some(value) = secret(ENV_OPENAI_API_KEY) {
        config.transcription.api_key = Some(value);
    }
    if let Some(value) = secret(ENV_VIDEO_API_KEY) {
        config.video.api_key = Some(value);
    }
    if let Some(addr) = env(ENV_BIND_ADDRESS).filter(|v| !v.trim().is_empty()) {
        config.listener.bind_address = addr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overlay_sets_secrets() {
        let config = finalize(
            GatewayConfig::default(),
            env_from(&[
                (ENV_GITHUB_CLIENT_ID, "Iv1.abc"),
                (ENV_GITHUB_CLIENT_SECRET, "shh"),
                (ENV_OPENAI_API_KEY, "sk-test"),
            ]),
        )
        .unwrap();

        assert!(config.github.credentials().is_some());
        assert_eq!(config.transcription.api_key.unwrap().expose(), "sk-test");
        assert!(config.video.api_key.is_none());
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let config = finalize(
            GatewayConfig::default(),
            env_from(&[(ENV_OPENAI_API_KEY, ""), (ENV_BIND_ADDRESS, " ")]),
        )
        .unwrap();

        assert!(config.transcription.api_key.is_none());
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_env_overrides_file_value() {
        let config = parse_config(
            r#"
            [video]
            api_key = "from-file"
            "#,
        )
        .unwrap();
        let config = finalize(config, env_from(&[(ENV_VIDEO_API_KEY, "from-env")])).unwrap();
        assert_eq!(config.video.api_key.unwrap().expose(), "from-env");
    }

    #[test]
    fn test_blank_file_secrets_are_unset() {
        let config = parse_config(
            r#"
            [github]
            client_id = ""
            client_secret = "  "

            [transcription]
            api_key = ""

            [video]
            api_key = ""
            "#,
        )
        .unwrap();
        let config = finalize(config, env_from(&[])).unwrap();

        assert!(config.github.credentials().is_none());
        assert!(config.transcription.api_key.is_none());
        assert!(config.video.api_key.is_none());
    }

    #[test]
    fn test_blank_file_secret_is_filled_from_env() {
        let config = parse_config("[transcription]\napi_key = \"\"\n").unwrap();
        let config = finalize(config, env_from(&[(ENV_OPENAI_API_KEY, "sk-env")])).unwrap();
        assert_eq!(config.transcription.api_key.unwrap().expose(), "sk-env");
    }

    #[test]
    fn test_half_configured_env_fails_validation() {
        let err = finalize(
            GatewayConfig::default(),
            env_from(&[(ENV_GITHUB_CLIENT_ID, "Iv1.abc")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("client_secret"));
    }

    #[test]
    fn test_parse_error_surfaces() {
        let err = parse_config("[listener\nbind_address = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
