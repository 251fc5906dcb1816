//! Core inference pipeline of the ASL alphabet detector.
//!
//! One deterministic map from a captured photo to a class label with a
//! confidence score, behind a single lazily-loaded classifier handle. The
//! camera page or any other front-end lives outside this crate and only
//! consumes [`pipeline::Prediction`] values.

pub mod cell;
pub mod config;
pub mod error;
pub mod labels;
pub mod nn;
pub mod pipeline;
pub mod preproc;
pub mod verdict;
