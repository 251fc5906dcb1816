//! Process-wide model cell.
//!
//! Loading the classifier is expensive and must happen at most once per
//! process: concurrent first users are serialized and the outcome, success
//! or failure, stays cached for the process lifetime. A failed load keeps
//! failing fast with the same error instead of re-reading the artifact.

use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use ndarray::Array4;

use crate::{
    error::PredictError,
    nn::{AslModel, InferModel},
};

/// Single-flight lazy holder of a loaded model.
pub struct ModelCell<M> {
    artifact: PathBuf,
    slot: OnceLock<Result<M, PredictError>>,
}

impl<M> ModelCell<M> {
    /// New empty cell for the artifact at `path`. Nothing is loaded yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            artifact: path.into(),
            slot: OnceLock::new(),
        }
    }

    /// The model, running `load` on first use only.
    ///
    /// Exactly one caller executes `load`; concurrent callers block until
    /// it finishes and then share the cached outcome, errors included.
    pub fn get_or_load_with<F>(&self, load: F) -> Result<&M, PredictError>
    where
        F: FnOnce(&Path) -> Result<M, PredictError>,
    {
        self.slot
            .get_or_init(|| load(&self.artifact))
            .as_ref()
            .map_err(|err| err.clone())
    }
}

impl ModelCell<AslModel> {
    /// The classifier, reading the ONNX artifact on first use.
    pub fn get_or_load(&self) -> Result<&AslModel, PredictError> {
        self.get_or_load_with(|path| AslModel::load(path))
    }
}

/// A cell of the real classifier is itself a model handle: the load
/// happens on the first forward pass.
impl InferModel for ModelCell<AslModel> {
    fn scores(&self, input: Array4<f32>) -> Result<Vec<f32>, PredictError> {
        self.get_or_load()?.scores(input)
    }
}
