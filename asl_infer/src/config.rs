//! Pipeline configuration.
//!
//! The observed detector variants differ only in threshold, artifact path
//! and control-token display texts; they collapse into this one surface.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Default confidence threshold for accepting a prediction.
pub const DEFAULT_THRESHOLD: f32 = 0.60;

/// Default model artifact name, resolved against the working directory.
pub const DEFAULT_ARTIFACT: &str = "model_asl.onnx";

/// Everything that varies between detector variants.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Path of the ONNX classifier artifact to load.
    pub artifact_path: PathBuf,

    /// Acceptance threshold; strictly-greater comparison.
    pub threshold: f32,

    /// Apply a softmax to the raw scores before the decision. Off by
    /// default: the exported classifier head already emits probabilities,
    /// the flag exists for logits-emitting exports.
    pub softmax: bool,

    /// Display-text overrides keyed by label, e.g. `"space" -> "SPASI"`.
    pub label_overrides: HashMap<String, String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT),
            threshold: DEFAULT_THRESHOLD,
            softmax: false,
            label_overrides: HashMap::new(),
        }
    }
}

impl PipelineConfig {
    /// Read a variant configuration from a JSON file. Missing fields keep
    /// their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}
