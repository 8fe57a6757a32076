use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, ORIGIN, USER_AGENT};
use tracing::info;

use crate::error::AppResult;
use crate::tts::{SynthesizedAudio, Synthesizer, TtsRequest, check_response};

pub const DEFAULT_URL: &str = "https://www.openai.fm/api/generate";
pub const BOUNDARY: &str = "----WebKitFormBoundarya027BOtfh6crFn7A";
const ORIGIN_VALUE: &str = "https://www.openai.fm";

/// The unofficial web endpoint. Takes a multipart form and honours vibe hints.
pub struct WebTts {
    client: reqwest::Client,
    url: String,
}

impl WebTts {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

/// Hand-built form so the boundary and field order stay fixed:
/// input, voice, vibe, prompt.
pub fn form_body(request: &TtsRequest) -> String {
    let voice = request.voice();
    let fields = [
        ("input", request.script.as_str()),
        ("voice", voice.as_str()),
        ("vibe", request.vibe_key.as_deref().unwrap_or("")),
        ("prompt", request.vibe_prompt.as_deref().unwrap_or("")),
    ];

    let mut lines = Vec::with_capacity(fields.len() * 3 + 1);
    for (name, value) in fields {
        lines.push(format!("--{}", BOUNDARY));
        lines.push(format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n",
            name
        ));
        lines.push(value.to_string());
    }
    lines.push(format!("--{}--", BOUNDARY));
    lines.join("\r\n")
}

#[async_trait]
impl Synthesizer for WebTts {
    fn name(&self) -> &'static str {
        "web"
    }

    async fn synthesize(&self, request: &TtsRequest) -> AppResult<SynthesizedAudio> {
        info!(
            "Calling web TTS ({} chars, voice {})",
            request.script.chars().count(),
            request.voice()
        );
        let response = self
            .client
            .post(&self.url)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .header(ORIGIN, ORIGIN_VALUE)
            .header(USER_AGENT, concat!("ttsrelay/", env!("CARGO_PKG_VERSION")))
            .body(form_body(request))
            .send()
            .await?;
        check_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TtsRequest {
        TtsRequest {
            script: "hi".into(),
            voice: "Echo".into(),
            vibe_key: Some("Calm".into()),
            vibe_prompt: Some("p".into()),
            file_name: None,
        }
    }

    #[test]
    fn form_fields_in_fixed_order() {
        let b = BOUNDARY;
        let expected = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"input\"\r\n\r\nhi\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"voice\"\r\n\r\necho\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"vibe\"\r\n\r\nCalm\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"prompt\"\r\n\r\np\r\n\
             --{b}--"
        );
        assert_eq!(form_body(&request()), expected);
    }

    #[test]
    fn missing_vibe_is_sent_empty() {
        let mut req = request();
        req.vibe_key = None;
        req.vibe_prompt = None;
        let body = form_body(&req);
        assert!(body.contains("name=\"vibe\"\r\n\r\n\r\n"));
        assert!(body.contains("name=\"prompt\"\r\n\r\n\r\n"));
    }
}
