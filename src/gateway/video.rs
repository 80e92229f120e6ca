//! Text-to-video generation proxy.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::{required, Gateway, InboundRequest};
use crate::http::response::GatewayError;
use crate::upstream::Upstream;

const GENERATION_FAILED: &str = "Failed to generate video";

/// Aspect ratios the generation API accepts.
pub const ASPECT_RATIOS: [&str; 7] = ["1:1", "16:9", "9:16", "4:3", "3:4", "21:9", "9:21"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoRequest {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    aspect_ratio: Option<String>,
    #[serde(default, rename = "loop")]
    looping: Option<bool>,
}

#[derive(Debug, Serialize)]
struct GenerationPayload<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<&'a str>,
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    looping: Option<bool>,
}

/// Success envelope: the upstream's generation record, untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoGeneration {
    pub success: bool,
    pub data: Value,
}

/// Pull a human-readable message out of the error vocabularies seen from
/// generation APIs: `{detail}`, `{error: "..."}`, `{error: {message}}`, `{message}`.
pub fn upstream_error_message(body: &Value) -> Option<String> {
    let candidates = [
        body.get("detail"),
        body.get("error"),
        body.get("error").and_then(|e| e.get("message")),
        body.get("message"),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

impl Gateway {
    pub(crate) async fn generate_video(
        &self,
        request: &InboundRequest,
    ) -> Result<VideoGeneration, GatewayError> {
        let body: VideoRequest = request.json_body()?;
        let prompt = required(&body.prompt, "Prompt is required")?;
        let aspect_ratio = body.aspect_ratio.as_deref().map(str::trim);
        if let Some(ratio) = aspect_ratio {
            if !ASPECT_RATIOS.contains(&ratio) {
                return Err(GatewayError::InvalidInput("Unsupported aspect ratio"));
            }
        }

        let settings = &self.config().video;
        let api_key = settings
            .api_key
            .as_ref()
            .ok_or(GatewayError::NotConfigured("Video generation not configured"))?;

        let payload = GenerationPayload {
            prompt,
            aspect_ratio,
            looping: body.looping,
        };
        let response = self
            .client()
            .post_json(Upstream::VideoGeneration, &settings.endpoint, Some(api_key), &payload)
            .await
            .map_err(|e| GatewayError::transport(GENERATION_FAILED, e))?;

        if !response.is_success() {
            let message = response
                .json::<Value>()
                .ok()
                .as_ref()
                .and_then(upstream_error_message)
                .unwrap_or_else(|| "Video generation failed".to_string());
            return Err(GatewayError::rejected(response.status, message, None));
        }

        let data: Value = response
            .json()
            .map_err(|e| GatewayError::transport(GENERATION_FAILED, e))?;

        Ok(VideoGeneration {
            success: true,
            data,
        })
    }
}
