use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::AppResult;
use crate::tts::{SynthesizedAudio, Synthesizer, TtsRequest, check_response};

pub const DEFAULT_URL: &str = "https://api.openai.com/v1/audio/speech";

/// Official speech endpoint. Vibe hints are not supported upstream and are dropped.
pub struct OpenAiTts {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct SpeechPayload<'a> {
    model: &'a str,
    voice: String,
    input: String,
    input_format: &'static str,
}

impl OpenAiTts {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn payload(&self, request: &TtsRequest) -> SpeechPayload<'_> {
        SpeechPayload {
            model: &self.model,
            voice: request.voice(),
            input: ssml(&request.script),
            input_format: "ssml",
        }
    }
}

pub fn ssml(script: &str) -> String {
    format!("<speak>{}</speak>", escape_xml(script))
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[async_trait]
impl Synthesizer for OpenAiTts {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn synthesize(&self, request: &TtsRequest) -> AppResult<SynthesizedAudio> {
        if request.vibe_key.is_some() || request.vibe_prompt.is_some() {
            debug!("Ignoring vibe hints for the official endpoint");
        }
        info!("Calling OpenAI speech with model {}", self.model);
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&self.payload(request))
            .send()
            .await?;
        check_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_is_escaped_into_speak_envelope() {
        assert_eq!(ssml("a < b & \"c\""), "<speak>a &lt; b &amp; &quot;c&quot;</speak>");
    }

    #[test]
    fn payload_drops_vibe_hints() {
        let tts = OpenAiTts::new(reqwest::Client::new(), DEFAULT_URL, "sk", "tts-1");
        let req = TtsRequest {
            script: "hello".into(),
            voice: "Nova".into(),
            vibe_key: Some("Calm".into()),
            vibe_prompt: Some("soft".into()),
            file_name: None,
        };
        let json = serde_json::to_value(tts.payload(&req)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "tts-1",
                "voice": "nova",
                "input": "<speak>hello</speak>",
                "input_format": "ssml",
            })
        );
    }
}
