//! Image preprocessing contract of the classifier.
//!
//! The network expects exactly what the training pipeline fed it: a 64x64
//! fit-cropped RGB image, intensities scaled to [0, 1], shaped NHWC with a
//! leading batch dimension of one. Any deviation here silently degrades
//! the predictions, so this module is the single place that builds inputs.

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use ndarray::Array4;

use crate::error::PredictError;

/// Input edge length of the classifier (pixels).
pub const INPUT_SIZE: u32 = 64;

/// Decode raw photo bytes into a bitmap.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, PredictError> {
    image::load_from_memory(bytes).map_err(|err| PredictError::InvalidImage(err.to_string()))
}

/// Prepare one raw image for the forward pass.
///
/// Accepts any dimensions and three or four channels; rejects zero-area
/// input. Returns the (1, 64, 64, 3) input tensor.
pub fn prepare(image: &DynamicImage) -> Result<Array4<f32>, PredictError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PredictError::InvalidImage(format!(
            "zero-area input ({width}x{height})"
        )));
    }

    // Fit, not stretch: crop to the target aspect ratio, then Lanczos
    // resample. Alpha is dropped only after the resize, in the same order
    // as the training pipeline.
    let fitted = image.resize_to_fill(INPUT_SIZE, INPUT_SIZE, FilterType::Lanczos3);
    let rgb = fitted.to_rgb8();

    let size = INPUT_SIZE as usize;
    let input = Array4::from_shape_fn((1, size, size, 3), |(_, y, x, c)| {
        rgb[(x as u32, y as u32)][c] as f32 / 255.0
    });

    Ok(input)
}
