use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{Method, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::args::BatchResponse;
use crate::batch::{generate_batch, generate_single};
use crate::error::{AppError, AppResult};
use crate::storage::AudioStore;
use crate::tts::{Synthesizer, TtsRequest};

/// Shared by every handler; owned by the process entry point.
#[derive(Clone)]
pub struct AppState {
    pub synth: Arc<dyn Synthesizer>,
    pub store: AudioStore,
    pub batch_response: BatchResponse,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GenerateBody {
    Batch(Vec<TtsRequest>),
    Single(TtsRequest),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DownloadBody {
    /// `index < 0` asks for the combined file.
    Batch {
        #[serde(rename = "fileName")]
        file_name: String,
        index: i64,
    },
    Path { path: String, filename: String },
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate-audio", post(generate_audio))
        .route("/download-audio", post(download_audio))
        .route("/download/{filename}", get(download_by_name))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[axum::debug_handler]
async fn generate_audio(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> AppResult<Response> {
    match body {
        GenerateBody::Single(request) => {
            let stored = generate_single(state.synth.as_ref(), &state.store, &request).await?;
            let path = FsPath::new(&stored.path).join(&stored.filename);
            Ok(Json(serde_json::json!({
                "filename": stored.filename,
                "path": path.display().to_string(),
            }))
            .into_response())
        }
        GenerateBody::Batch(requests) => {
            let out = generate_batch(state.synth.as_ref(), &state.store, &requests).await?;
            match state.batch_response {
                BatchResponse::File => {
                    let path = FsPath::new(&out.combined.path).join(&out.combined.filename);
                    send_file(&state.store, path, &out.combined.filename).await
                }
                BatchResponse::Manifest => {
                    let mut manifest = out.items;
                    manifest.push(out.combined);
                    Ok(Json(manifest).into_response())
                }
            }
        }
    }
}

#[axum::debug_handler]
async fn download_audio(
    State(state): State<AppState>,
    Json(body): Json<DownloadBody>,
) -> AppResult<Response> {
    let (path, filename) = match body {
        DownloadBody::Batch { file_name, index } => state.store.batch_file(&file_name, index),
        DownloadBody::Path { path, filename } => (PathBuf::from(path).join(&filename), filename),
    };
    send_file(&state.store, path, &filename).await
}

async fn download_by_name(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let path = state.store.root_file(&filename);
    send_file(&state.store, path, &filename).await
}

async fn send_file(store: &AudioStore, path: PathBuf, filename: &str) -> AppResult<Response> {
    let full = store.locate(&path).await?;
    let file = tokio::fs::File::open(&full).await?;
    let len = file.metadata().await?.len();
    info!("Serving {} ({} bytes)", full.display(), len);

    let headers = [
        (header::CONTENT_TYPE, store.format().mime_type().to_string()),
        (header::CONTENT_LENGTH, len.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}

async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    let err = AppError::NotFound(PathBuf::from(uri.path()));
    tracing::debug!("No route for {} {}", method, uri.path());
    err
}
