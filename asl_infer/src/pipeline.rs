//! The inference pipeline: one raw image in, one prediction out.
//!
//! Stateless per call. The only shared piece is the model handle, used
//! read-only, so one pipeline can serve any number of sequential requests.

use image::DynamicImage;
use serde::Serialize;

use crate::{
    config::PipelineConfig,
    error::PredictError,
    labels::{CLASS_LABELS, NUM_CLASSES},
    nn::InferModel,
    preproc,
    verdict::{self, Verdict},
};

/// One classification outcome.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    /// Winning class label, never altered by display rewriting.
    pub label: &'static str,
    /// Index of the winning class.
    pub index: usize,
    /// Score of the winning class.
    pub confidence: f32,
}

/// Deterministic image-to-label pipeline around one model handle.
pub struct Pipeline<M> {
    model: M,
    config: PipelineConfig,
}

impl<M: InferModel> Pipeline<M> {
    /// New pipeline around an explicit model handle.
    pub fn new(model: M, config: PipelineConfig) -> Self {
        Self { model, config }
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Map one raw image to the winning (label, confidence) pair.
    ///
    /// Preprocess, forward pass, optional softmax, then argmax over the
    /// 29 scores. Same image and same model give the same prediction.
    pub fn predict(&self, image: &DynamicImage) -> Result<Prediction, PredictError> {
        let input = preproc::prepare(image)?;
        let mut scores = self.model.scores(input)?;
        self.validate_scores(&scores)?;

        if self.config.softmax {
            softmax_in_place(&mut scores);
        }

        let (index, confidence) = argmax(&scores);
        let label = CLASS_LABELS[index];
        log::debug!("predicted {label} at {confidence:.3}");

        Ok(Prediction {
            label,
            index,
            confidence,
        })
    }

    /// Acceptance verdict for `prediction` under this pipeline's
    /// threshold.
    pub fn verdict(&self, prediction: &Prediction) -> Verdict {
        verdict::assess(prediction.confidence, self.config.threshold)
    }

    /// Display text for `prediction` with this variant's overrides.
    pub fn display_text(&self, prediction: &Prediction) -> String {
        verdict::display_text(prediction.label, &self.config.label_overrides)
    }

    /// Reject score vectors the decision cannot be computed from. Keeps
    /// the argmax below panic-free: a validated vector is non-empty and
    /// index-aligned with the label set.
    fn validate_scores(&self, scores: &[f32]) -> Result<(), PredictError> {
        if scores.len() != NUM_CLASSES {
            return Err(PredictError::model_unavailable(
                &self.config.artifact_path,
                format!("model scored {} classes, expected {NUM_CLASSES}", scores.len()),
            ));
        }
        if let Some(bad) = scores.iter().find(|score| !score.is_finite()) {
            return Err(PredictError::model_unavailable(
                &self.config.artifact_path,
                format!("non-finite score {bad} in model output"),
            ));
        }
        Ok(())
    }
}

/// Index and value of the maximum score, first index on ties. The choice
/// must match `numpy.argmax` on the training side, which also takes the
/// first maximum.
fn argmax(scores: &[f32]) -> (usize, f32) {
    let mut index = 0;
    let mut best = scores[0];
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > best {
            index = i;
            best = score;
        }
    }
    (index, best)
}

/// Numerically stable in-place softmax.
fn softmax_in_place(scores: &mut [f32]) {
    let max = scores.iter().fold(f32::NEG_INFINITY, |acc, &s| acc.max(s));
    let mut sum = 0.0;
    for score in scores.iter_mut() {
        *score = (*score - max).exp();
        sum += *score;
    }
    for score in scores.iter_mut() {
        *score /= sum;
    }
}
