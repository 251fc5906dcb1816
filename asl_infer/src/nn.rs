//! Neural-network handle of the pipeline.
//!
//! Wraps the ONNX export of the trained ASL classifier behind the
//! [`InferModel`] trait, so front-ends get the real tract-onnx plan while
//! tests inject stub handles.

use std::path::{Path, PathBuf};

use ndarray::Array4;
use smallvec::SmallVec;
use tract_onnx::prelude::*;

use crate::{error::PredictError, preproc::INPUT_SIZE};

type NnModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;
type NnOut = SmallVec<[TValue; 4]>;

/// A loaded classifier: one forward pass from a prepared input to the raw
/// per-class scores.
///
/// Implementations must be safe for concurrent read-only use; the handle
/// is shared, never mutated, after initialization.
pub trait InferModel {
    /// Run the forward pass on one prepared (1, 64, 64, 3) input and
    /// return the score vector, aligned index-for-index with
    /// [`crate::labels::CLASS_LABELS`].
    fn scores(&self, input: Array4<f32>) -> Result<Vec<f32>, PredictError>;
}

/// The ASL alphabet classifier, an optimized tract-onnx plan.
#[derive(Debug)]
pub struct AslModel {
    model: NnModel,
    artifact: PathBuf,
}

impl AslModel {
    /// Load and optimize the ONNX artifact at `path`.
    ///
    /// Every failure maps to [`PredictError::ModelUnavailable`] naming the
    /// artifact, whether the file is missing, unreadable or not a usable
    /// model.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PredictError> {
        let path = path.as_ref();
        let model = load_plan(path)
            .map_err(|err| PredictError::model_unavailable(path, format!("{err:#}")))?;

        log::info!("Loaded classifier from {}", path.display());
        Ok(Self {
            model,
            artifact: path.to_owned(),
        })
    }
}

impl InferModel for AslModel {
    fn scores(&self, input: Array4<f32>) -> Result<Vec<f32>, PredictError> {
        let tensor: Tensor = input.into();
        let outputs: NnOut = self.model.run(tvec!(tensor.into())).map_err(|err| {
            PredictError::model_unavailable(&self.artifact, format!("forward pass failed: {err:#}"))
        })?;

        let scores = outputs[0].to_array_view::<f32>().map_err(|err| {
            PredictError::model_unavailable(&self.artifact, format!("unusable output: {err:#}"))
        })?;

        // Output comes back as (1, 29); the batch dimension flattens away.
        Ok(scores.iter().copied().collect())
    }
}

/// Build the runnable plan with the input fact pinned to the trained
/// layout, one 64x64 RGB image per batch (NHWC).
fn load_plan(path: &Path) -> TractResult<NnModel> {
    let size = INPUT_SIZE as usize;
    let input_fact = InferenceFact::dt_shape(f32::datum_type(), tvec!(1, size, size, 3));

    tract_onnx::onnx()
        .model_for_path(path)?
        .with_input_fact(0, input_fact)?
        .into_optimized()?
        .into_runnable()
}
