use bytes::Bytes;
use tracing::{debug, info};

use crate::audio::{self, AudioFormat};
use crate::error::{AppError, AppResult};
use crate::storage::{AudioStore, StoredFile};
use crate::tts::{Synthesizer, TtsRequest};

#[derive(Debug)]
pub struct BatchOutput {
    pub items: Vec<StoredFile>,
    pub combined: StoredFile,
}

/// Synthesizes every item in order, one upstream call at a time, then writes
/// the combined file. The first failure ends the batch; files written for
/// earlier items stay where they are.
pub async fn generate_batch(
    synth: &dyn Synthesizer,
    store: &AudioStore,
    requests: &[TtsRequest],
) -> AppResult<BatchOutput> {
    let first = requests.first().ok_or(AppError::EmptyBatch)?;
    let base = first
        .file_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or(AppError::MissingBaseName)?;

    info!(
        "Generating batch '{}' with {} items via {}",
        base,
        requests.len(),
        synth.name()
    );

    let mut parts: Vec<Bytes> = Vec::with_capacity(requests.len());
    let mut items = Vec::with_capacity(requests.len());
    for (i, request) in requests.iter().enumerate() {
        info!("Synthesizing item {}/{}", i + 1, requests.len());
        debug!("Item text: {}", request.script);
        let audio = synth.synthesize(request).await?;
        items.push(store.write_indexed(base, i, &audio.bytes).await?);
        parts.push(audio.bytes);
    }

    let combined = audio::combine(store.format(), &parts)?;
    if store.format() == AudioFormat::Wav {
        if let Ok(secs) = audio::wav_duration_seconds(&combined) {
            info!("Combined audio runs {:.2} seconds", secs);
        }
    }
    let combined = store.write_combined(base, &combined).await?;
    Ok(BatchOutput { items, combined })
}

pub async fn generate_single(
    synth: &dyn Synthesizer,
    store: &AudioStore,
    request: &TtsRequest,
) -> AppResult<StoredFile> {
    info!("Generating single item via {}", synth.name());
    let audio = synth.synthesize(request).await?;
    store.write_timestamped(&audio.bytes).await
}
