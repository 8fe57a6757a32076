use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("request list is empty")]
    EmptyBatch,

    #[error("batch needs a fileName on its first item")]
    MissingBaseName,

    /// Non-200 from the provider; forwarded as-is.
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("audio merge failed: {0}")]
    Merge(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmptyBatch | Self::MissingBaseName => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
            Self::UnsupportedContentType(_) | Self::Merge(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Upstream { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_is_forwarded() {
        let err = AppError::Upstream {
            status: 429,
            body: "slow down".into(),
        };
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.detail(), "slow down");
    }

    #[test]
    fn bogus_upstream_status_becomes_bad_gateway() {
        let err = AppError::Upstream {
            status: 42,
            body: String::new(),
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn content_type_mismatch_is_internal() {
        let err = AppError::UnsupportedContentType("text/html".into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail(), "Unsupported content type: text/html");
    }

    #[test]
    fn client_errors() {
        assert_eq!(AppError::EmptyBatch.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::NotFound(PathBuf::from("x.mp3")).status(),
            StatusCode::NOT_FOUND
        );
    }
}
