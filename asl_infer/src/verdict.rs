//! Acceptance policy and display rewriting for prediction results.
//!
//! Both are contracts for the front-end: the verdict partitions results by
//! a confidence threshold, and the display text rewrites the three control
//! tokens into something readable. Neither alters the underlying label.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How a front-end should treat a prediction.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Verdict {
    /// Confidence strictly above the threshold: show as the detected
    /// answer.
    Accepted,
    /// Confidence at or below the threshold: show as a low-confidence
    /// guess and ask for a retake.
    Uncertain,
}

/// Partition a confidence against `threshold`.
///
/// Strictly greater: a confidence exactly at the threshold is uncertain.
pub fn assess(confidence: f32, threshold: f32) -> Verdict {
    if confidence > threshold {
        Verdict::Accepted
    } else {
        Verdict::Uncertain
    }
}

/// Display text for `label`.
///
/// Variant overrides win; otherwise the three control tokens get their
/// built-in wording and letters pass through unchanged.
pub fn display_text(label: &str, overrides: &HashMap<String, String>) -> String {
    if let Some(text) = overrides.get(label) {
        return text.clone();
    }

    match label {
        "del" => "delete".to_owned(),
        "nothing" => "no hand detected".to_owned(),
        "space" => "space".to_owned(),
        _ => label.to_owned(),
    }
}
