use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// One item of a generation call as the client sends it.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsRequest {
    pub script: String,
    pub voice: String,
    #[serde(default)]
    pub vibe_key: Option<String>,
    #[serde(default)]
    pub vibe_prompt: Option<String>,
    /// Base name of a batch: subdirectory and file prefix.
    #[serde(default)]
    pub file_name: Option<String>,
}

impl TtsRequest {
    pub fn voice(&self) -> String {
        self.voice.to_lowercase()
    }
}

#[derive(Clone, Debug)]
pub struct SynthesizedAudio {
    pub bytes: Bytes,
    pub content_type: String,
}

/// An upstream that turns a script into audio.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn synthesize(&self, request: &TtsRequest) -> AppResult<SynthesizedAudio>;
}

/// Loose check on the declared type only; the payload itself is never inspected.
pub fn looks_like_audio(content_type: &str) -> bool {
    let ct = content_type.to_ascii_lowercase();
    ct.contains("audio") || ct.contains("mpeg") || ct.contains("mp3")
}

/// Applies the shared upstream contract: non-200 is forwarded with its body,
/// and a 200 must declare an audio content type.
pub async fn check_response(response: reqwest::Response) -> AppResult<SynthesizedAudio> {
    let status = response.status();
    if status != reqwest::StatusCode::OK {
        let body = response.text().await?;
        return Err(AppError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !looks_like_audio(&content_type) {
        return Err(AppError::UnsupportedContentType(content_type));
    }

    let bytes = response.bytes().await?;
    debug!("Upstream returned {} bytes of {}", bytes.len(), content_type);
    Ok(SynthesizedAudio {
        bytes,
        content_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_content_types() {
        assert!(looks_like_audio("audio/mpeg"));
        assert!(looks_like_audio("audio/wav; charset=binary"));
        assert!(looks_like_audio("application/x-mp3"));
        assert!(looks_like_audio("Audio/MPEG"));
        assert!(!looks_like_audio("text/html; charset=utf-8"));
        assert!(!looks_like_audio("application/json"));
        assert!(!looks_like_audio(""));
    }

    #[test]
    fn request_deserializes_camel_case() {
        let req: TtsRequest = serde_json::from_str(
            r#"{"script":"hi","voice":"Alloy","vibeKey":"Calm","vibePrompt":"p","fileName":"b1"}"#,
        )
        .unwrap();
        assert_eq!(req.voice(), "alloy");
        assert_eq!(req.vibe_key.as_deref(), Some("Calm"));
        assert_eq!(req.file_name.as_deref(), Some("b1"));
    }

    #[test]
    fn vibe_fields_are_optional() {
        let req: TtsRequest = serde_json::from_str(r#"{"script":"hi","voice":"echo"}"#).unwrap();
        assert!(req.vibe_key.is_none());
        assert!(req.vibe_prompt.is_none());
        assert!(req.file_name.is_none());
    }
}
