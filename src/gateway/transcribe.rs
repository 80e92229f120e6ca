//! Audio transcription proxy.
//!
//! The browser records audio, base64-encodes it into a data URI, and posts
//! it as JSON. The transcription API wants multipart/form-data with the raw
//! bytes as a file part, so this route does the re-encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::gateway::{required, Gateway, InboundRequest};
use crate::http::response::GatewayError;
use crate::multipart::MultipartForm;
use crate::upstream::Upstream;

pub const AUDIO_FIELD: &str = "file";
pub const AUDIO_FILENAME: &str = "audio.webm";
pub const AUDIO_CONTENT_TYPE: &str = "audio/webm";

const NO_AUDIO: &str = "No audio data provided";
const INVALID_AUDIO: &str = "Invalid audio data";
const PROCESSING_FAILED: &str = "Failed to process audio";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AudioRequest {
    #[serde(default)]
    audio_data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Success shape returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub success: bool,
    pub text: String,
}

/// Decode the payload of a `data:<mime>;base64,<payload>` URI.
///
/// Everything up to the first comma is ignored, so the declared mime type
/// does not have to match what the upstream is told.
pub fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>, GatewayError> {
    let (_, payload) = data_uri
        .split_once(',')
        .ok_or(GatewayError::InvalidInput(INVALID_AUDIO))?;
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(GatewayError::MissingField(NO_AUDIO));
    }
    STANDARD
        .decode(payload)
        .map_err(|_| GatewayError::InvalidInput(INVALID_AUDIO))
}

impl Gateway {
    pub(crate) async fn transcribe(
        &self,
        request: &InboundRequest,
    ) -> Result<Transcript, GatewayError> {
        let body: AudioRequest = request.json_body()?;
        let audio = decode_data_uri(required(&body.audio_data, NO_AUDIO)?)?;

        let settings = &self.config().transcription;
        let api_key = settings
            .api_key
            .as_ref()
            .ok_or(GatewayError::NotConfigured("OpenAI API key not configured"))?;

        tracing::debug!(bytes = audio.len(), "Decoded audio payload");

        let encoded = MultipartForm::new()
            .file(AUDIO_FIELD, AUDIO_FILENAME, AUDIO_CONTENT_TYPE, audio)
            .text("model", settings.model.as_str())
            .text("language", settings.language.as_str())
            .encode()
            .map_err(|e| GatewayError::payload_build(PROCESSING_FAILED, e))?;

        let response = self
            .client()
            .post_multipart(Upstream::Transcription, &settings.endpoint, api_key, encoded)
            .await
            .map_err(|e| GatewayError::transport(PROCESSING_FAILED, e))?;

        if !response.is_success() {
            return Err(GatewayError::rejected(
                response.status,
                "Transcription failed",
                Some(response.text()),
            ));
        }

        let whisper: WhisperResponse = response
            .json()
            .map_err(|e| GatewayError::transport(PROCESSING_FAILED, e))?;

        Ok(Transcript {
            success: true,
            text: whisper.text,
        })
    }
}
