//! Terminal front-end of the ASL alphabet detector.
//!
//! Stands in for the camera page: decodes captured photos from disk, runs
//! the inference pipeline once per photo and renders the accepted or
//! uncertain result card as text. All decision values come from
//! `asl_infer`; this binary only presents them.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use asl_infer::{
    cell::ModelCell,
    config::PipelineConfig,
    error::PredictError,
    nn::AslModel,
    pipeline::{Pipeline, Prediction},
    preproc,
    verdict::Verdict,
};
use clap::Parser;
use env_logger::TimestampPrecision;
use image::GenericImageView;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Detect ASL alphabet signs on captured photos")]
struct Args {
    /// Captured photos to classify, one prediction per file
    #[clap(required = true)]
    photos: Vec<PathBuf>,

    /// Path of the ONNX classifier artifact
    #[clap(long)]
    model: Option<PathBuf>,

    /// Acceptance threshold, strictly-greater comparison
    #[clap(long)]
    threshold: Option<f32>,

    /// Softmax the raw scores before the decision (logits-emitting exports)
    #[clap(long)]
    softmax: bool,

    /// JSON variant configuration; explicit flags win over file values
    #[clap(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;
    log::info!(
        "threshold {:.2}, softmax {}, artifact {}",
        config.threshold,
        config.softmax,
        config.artifact_path.display()
    );

    let cell: ModelCell<AslModel> = ModelCell::new(config.artifact_path.clone());
    let pipeline = Pipeline::new(cell, config);

    for photo in &args.photos {
        if let Err(err) = run_photo(&pipeline, photo) {
            // A missing model fails every later photo the same way, so
            // stop; a bad photo only skips itself.
            if let Some(PredictError::ModelUnavailable { .. }) = err.downcast_ref() {
                return Err(err).context("classifier unavailable");
            }
            eprintln!("{}: skipped ({err:#})", photo.display());
        }
    }

    Ok(())
}

/// Variant configuration: file values first, explicit flags win.
fn resolve_config(args: &Args) -> anyhow::Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(model) = &args.model {
        config.artifact_path = model.clone();
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if args.softmax {
        config.softmax = true;
    }

    Ok(config)
}

fn run_photo(pipeline: &Pipeline<ModelCell<AslModel>>, path: &Path) -> anyhow::Result<()> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let photo = preproc::decode(&bytes)?;

    let (width, height) = photo.dimensions();
    log::debug!("decoded {}: {width}x{height}", path.display());

    let prediction = pipeline.predict(&photo)?;
    render(pipeline, path, &prediction);
    Ok(())
}

/// The two result cards of the camera page, as text.
fn render(pipeline: &Pipeline<ModelCell<AslModel>>, path: &Path, prediction: &Prediction) {
    let percent = prediction.confidence * 100.0;
    let threshold_percent = pipeline.config().threshold * 100.0;

    println!("=== {} ===", path.display());
    match pipeline.verdict(prediction) {
        Verdict::Accepted => {
            println!("Detected: {}", pipeline.display_text(prediction));
            println!("Confidence: {percent:.1}% (threshold {threshold_percent:.0}%)");
        }
        Verdict::Uncertain => {
            println!("Not sure - best guess: {}?", prediction.label);
            println!("Confidence only {percent:.1}%, needs more than {threshold_percent:.0}%.");
            println!("Retake the photo: bright room, plain background, hand clear and in focus.");
        }
    }
}
