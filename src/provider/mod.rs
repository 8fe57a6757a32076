mod openai;
mod web;

pub use openai::OpenAiTts;
pub use web::{BOUNDARY, WebTts, form_body};

use std::sync::Arc;
use std::time::Duration;

use crate::args::{Args, ProviderKind};
use crate::tts::Synthesizer;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("OPENAI_API_KEY must be set for the openai provider")]
    MissingApiKey,
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Builds the configured upstream from the command line.
pub fn from_args(args: &Args) -> Result<Arc<dyn Synthesizer>, ProviderError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = args.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder.build()?;

    let provider: Arc<dyn Synthesizer> = match args.provider {
        ProviderKind::Web => Arc::new(WebTts::new(
            client,
            args.upstream_url.as_deref().unwrap_or(web::DEFAULT_URL),
        )),
        ProviderKind::Openai => {
            let api_key = args
                .api_key
                .as_deref()
                .filter(|k| !k.is_empty())
                .ok_or(ProviderError::MissingApiKey)?;
            Arc::new(OpenAiTts::new(
                client,
                args.upstream_url.as_deref().unwrap_or(openai::DEFAULT_URL),
                api_key,
                args.model.as_str(),
            ))
        }
    };
    Ok(provider)
}
