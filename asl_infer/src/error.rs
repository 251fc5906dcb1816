//! Error taxonomy of the inference pipeline.
//!

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the front-end by the pipeline.
///
/// `Clone` is load-bearing: a failed model load is cached for the process
/// lifetime and the identical error is handed out on every later call.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PredictError {
    /// The model artifact is missing, unreadable or incompatible. The
    /// message names the artifact so the user knows which file to upload.
    #[error("model artifact {} unavailable: {reason}", .path.display())]
    ModelUnavailable { path: PathBuf, reason: String },

    /// The input could not be decoded into a usable bitmap. The user is
    /// expected to retake the photo.
    #[error("invalid input image: {0}")]
    InvalidImage(String),
}

impl PredictError {
    pub fn model_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
