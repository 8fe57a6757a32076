pub mod args;
pub mod audio;
pub mod batch;
pub mod error;
pub mod provider;
pub mod server;
pub mod storage;
pub mod tts;

pub use error::{AppError, AppResult};
