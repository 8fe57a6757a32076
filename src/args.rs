use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::audio::AudioFormat;

#[derive(Parser, Debug)]
#[command(name = "ttsrelay", about = "Relay TTS requests to an upstream provider and keep the audio on disk")]
pub struct Args {
    /// listen on host:port
    #[clap(long, env = "TTS_LISTEN", default_value = "127.0.0.1:8000")]
    pub listen: String,

    #[clap(long, env = "TTS_OUTPUT_DIR", default_value = "audio_outputs")]
    pub output_dir: PathBuf,

    #[clap(long, value_enum, default_value_t = ProviderKind::Web)]
    pub provider: ProviderKind,

    #[clap(long, value_enum, default_value_t = AudioFormat::Mp3)]
    pub format: AudioFormat,

    /// What a batch call answers with
    #[clap(long, value_enum, default_value_t = BatchResponse::File)]
    pub batch_response: BatchResponse,

    /// Override the provider endpoint
    #[clap(long)]
    pub upstream_url: Option<String>,

    #[clap(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[clap(long, default_value = "tts-1-hd")]
    pub model: String,

    #[clap(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// Unofficial web endpoint, honours vibe hints
    Web,
    /// Official speech API, needs an API key
    Openai,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum BatchResponse {
    /// Stream the combined file back
    #[default]
    File,
    /// Return the list of stored paths
    Manifest,
}
