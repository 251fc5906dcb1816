//! End-to-end pipeline scenarios with stub classifier handles.

use std::collections::HashMap;

use asl_infer::{
    cell::ModelCell,
    config::PipelineConfig,
    error::PredictError,
    labels::{index_of, NUM_CLASSES},
    nn::{AslModel, InferModel},
    pipeline::Pipeline,
    verdict::Verdict,
};
use image::{DynamicImage, ImageBuffer, Rgb, Rgba};
use ndarray::Array4;

/// Classifier stub returning a fixed score vector.
struct StubModel {
    scores: Vec<f32>,
}

impl StubModel {
    fn new(scores: Vec<f32>) -> Self {
        Self { scores }
    }

    /// Probability-like scores peaking at `index`, the rest sharing the
    /// leftover mass evenly.
    fn peaked(index: usize, peak: f32) -> Self {
        let rest = (1.0 - peak) / (NUM_CLASSES - 1) as f32;
        let mut scores = vec![rest; NUM_CLASSES];
        scores[index] = peak;
        Self::new(scores)
    }
}

impl InferModel for StubModel {
    fn scores(&self, input: Array4<f32>) -> Result<Vec<f32>, PredictError> {
        // The pipeline must always hand over the trained input layout.
        assert_eq!(input.dim(), (1, 64, 64, 3));
        Ok(self.scores.clone())
    }
}

fn black_photo(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([0, 0, 0])))
}

fn config_with_threshold(threshold: f32) -> PipelineConfig {
    PipelineConfig {
        threshold,
        ..PipelineConfig::default()
    }
}

/// The fixed scenario from the reference data: an all-black 64x64 photo
/// and a stub scoring `del` at 0.94 must come back accepted under both
/// observed thresholds.
#[test]
fn del_at_094_is_accepted_under_both_observed_thresholds() {
    let mut scores = vec![0.02; 26];
    scores.extend([0.94, 0.02, 0.02]);

    for threshold in [0.60, 0.70] {
        let pipeline = Pipeline::new(
            StubModel::new(scores.clone()),
            config_with_threshold(threshold),
        );

        let prediction = pipeline.predict(&black_photo(64, 64)).unwrap();
        assert_eq!(prediction.label, "del");
        assert_eq!(prediction.index, 26);
        assert_eq!(prediction.confidence, 0.94);
        assert_eq!(pipeline.verdict(&prediction), Verdict::Accepted);
    }
}

#[test]
fn score_vector_arity_is_enforced() {
    let pipeline = Pipeline::new(StubModel::new(vec![0.2; 5]), PipelineConfig::default());

    match pipeline.predict(&black_photo(64, 64)) {
        Err(PredictError::ModelUnavailable { reason, .. }) => {
            assert!(reason.contains("5"));
            assert!(reason.contains("29"));
        }
        other => panic!("expected ModelUnavailable, got {other:?}"),
    }
}

#[test]
fn prediction_is_deterministic() {
    let photo = DynamicImage::ImageRgb8(ImageBuffer::from_fn(120, 90, |x, y| {
        Rgb([x as u8, y as u8, ((x + y) % 256) as u8])
    }));
    let pipeline = Pipeline::new(
        StubModel::peaked(index_of("Q").unwrap(), 0.83),
        PipelineConfig::default(),
    );

    let first = pipeline.predict(&photo).unwrap();
    let second = pipeline.predict(&photo).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.label, "Q");
    assert!((0.0..=1.0).contains(&first.confidence));
}

#[test]
fn rgba_photo_predicts_like_its_rgb_twin() {
    let rgb = DynamicImage::ImageRgb8(ImageBuffer::from_fn(100, 200, |x, y| {
        Rgb([x as u8, y as u8, ((x * y) % 256) as u8])
    }));
    let rgba = DynamicImage::ImageRgba8(ImageBuffer::from_fn(100, 200, |x, y| {
        Rgba([x as u8, y as u8, ((x * y) % 256) as u8, 255])
    }));

    let pipeline = Pipeline::new(
        StubModel::peaked(index_of("W").unwrap(), 0.77),
        PipelineConfig::default(),
    );

    assert_eq!(
        pipeline.predict(&rgb).unwrap(),
        pipeline.predict(&rgba).unwrap()
    );
}

/// Low confidence is a verdict, not an error: the full prediction is
/// still computed and only the value comparison differs.
#[test]
fn low_confidence_still_yields_a_full_prediction() {
    let pipeline = Pipeline::new(
        StubModel::peaked(index_of("R").unwrap(), 0.41),
        config_with_threshold(0.60),
    );

    let prediction = pipeline.predict(&black_photo(64, 64)).unwrap();
    assert_eq!(prediction.label, "R");
    assert!((prediction.confidence - 0.41).abs() < 1e-6);
    assert_eq!(pipeline.verdict(&prediction), Verdict::Uncertain);
}

#[test]
fn confidence_exactly_at_threshold_is_uncertain() {
    let pipeline = Pipeline::new(
        StubModel::peaked(index_of("B").unwrap(), 0.60),
        config_with_threshold(0.60),
    );

    let prediction = pipeline.predict(&black_photo(64, 64)).unwrap();
    assert_eq!(prediction.confidence, 0.60);
    assert_eq!(pipeline.verdict(&prediction), Verdict::Uncertain);
}

#[test]
fn display_rewriting_never_touches_the_label() {
    let config = PipelineConfig {
        label_overrides: HashMap::from([("space".to_owned(), "SPASI".to_owned())]),
        ..PipelineConfig::default()
    };
    let pipeline = Pipeline::new(StubModel::peaked(index_of("space").unwrap(), 0.9), config);

    let prediction = pipeline.predict(&black_photo(64, 64)).unwrap();
    assert_eq!(prediction.label, "space");
    assert_eq!(pipeline.display_text(&prediction), "SPASI");
}

#[test]
fn softmax_flag_normalizes_logits() {
    // Logits, not probabilities: the winner at 5.0, the rest at zero.
    let mut logits = vec![0.0; NUM_CLASSES];
    logits[index_of("C").unwrap()] = 5.0;

    let raw = Pipeline::new(StubModel::new(logits.clone()), PipelineConfig::default());
    let softmaxed = Pipeline::new(
        StubModel::new(logits),
        PipelineConfig {
            softmax: true,
            ..PipelineConfig::default()
        },
    );

    let raw_prediction = raw.predict(&black_photo(64, 64)).unwrap();
    assert_eq!(raw_prediction.confidence, 5.0);

    let soft_prediction = softmaxed.predict(&black_photo(64, 64)).unwrap();
    assert_eq!(soft_prediction.label, "C");
    let expected = 5.0_f32.exp() / (5.0_f32.exp() + (NUM_CLASSES - 1) as f32);
    assert!((soft_prediction.confidence - expected).abs() < 1e-6);
}

#[test]
fn zero_area_photo_is_invalid() {
    let pipeline = Pipeline::new(StubModel::peaked(0, 0.9), PipelineConfig::default());

    match pipeline.predict(&black_photo(0, 0)) {
        Err(PredictError::InvalidImage(_)) => {}
        other => panic!("expected InvalidImage, got {other:?}"),
    }
}

/// A pipeline wired to a lazy cell keeps failing fast once the load
/// failed, and the error names the artifact it wanted.
#[test]
fn unavailable_model_fails_fast_through_the_pipeline() {
    let config = PipelineConfig {
        artifact_path: "missing_model.onnx".into(),
        ..PipelineConfig::default()
    };
    let cell: ModelCell<AslModel> = ModelCell::new(config.artifact_path.clone());
    let pipeline = Pipeline::new(cell, config);

    let first = pipeline.predict(&black_photo(64, 64)).unwrap_err();
    let second = pipeline.predict(&black_photo(64, 64)).unwrap_err();

    assert_eq!(first, second);
    assert!(matches!(first, PredictError::ModelUnavailable { .. }));
    assert!(first.to_string().contains("missing_model.onnx"));
}
