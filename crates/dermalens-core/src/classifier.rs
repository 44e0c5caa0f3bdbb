//! Skin-type classifier via ONNX Runtime.
//!
//! Runs a 4-class EfficientNetB2-export over a face crop. The exported
//! model embeds its own input scaling, so the tensor carries raw 0-255
//! pixel values in NHWC layout.

use crate::types::SkinType;
use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use thiserror::Error;

// --- Named constants ---
/// EfficientNetB2 native resolution.
const CLASSIFIER_INPUT_SIZE: usize = 260;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Model file not found: {0}")]
    ModelNotFound(String),
    #[error("Model prediction failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid predicted index: {0}")]
    InvalidClassIndex(usize),
    #[error("ort: {0}")]
    Ort(#[from] ort::Error),
}

/// Result of classifying one face crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub skin_type: SkinType,
    /// Winning class probability as a percentage, rounded to one decimal.
    pub confidence: f32,
}

/// Four-class skin-type classifier.
#[derive(Debug)]
pub struct SkinClassifier {
    session: Session,
}

impl SkinClassifier {
    /// Load the classifier ONNX model from the given path.
    pub fn load(model_path: &str) -> Result<Self, ClassifierError> {
        if !Path::new(model_path).exists() {
            return Err(ClassifierError::ModelNotFound(model_path.to_string()));
        }

        let session = Session::builder()?
            .with_intra_threads(2)?
            .commit_from_file(model_path)?;

        tracing::info!(
            path = model_path,
            inputs = ?session.inputs().iter().map(|i| (i.name(), i.dtype())).collect::<Vec<_>>(),
            outputs = ?session.outputs().iter().map(|o| o.name()).collect::<Vec<_>>(),
            "loaded skin classifier model"
        );

        Ok(Self { session })
    }

    /// Classify a face crop, returning the winning skin type and its
    /// confidence. The crop is resized to the model's native resolution
    /// internally.
    pub fn classify(&mut self, face: &RgbImage) -> Result<Prediction, ClassifierError> {
        let input = Self::preprocess(face);

        let outputs = self.session.run(ort::inputs![TensorRef::from_array_view(input.view())?])?;

        let (_, raw_data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::InferenceFailed(format!("output extraction: {e}")))?;

        let probs: Vec<f32> = raw_data.to_vec();
        if probs.is_empty() {
            return Err(ClassifierError::InferenceFailed("empty output".to_string()));
        }

        let idx = argmax(&probs);
        let skin_type =
            SkinType::from_class_index(idx).ok_or(ClassifierError::InvalidClassIndex(idx))?;
        let confidence = confidence_percent(probs[idx]);

        tracing::debug!(%skin_type, confidence, "classification complete");

        Ok(Prediction { skin_type, confidence })
    }

    /// Preprocess a face crop into a NHWC float tensor of raw pixel values.
    fn preprocess(face: &RgbImage) -> Array4<f32> {
        let size = CLASSIFIER_INPUT_SIZE as u32;
        let resized = imageops::resize(face, size, size, FilterType::Triangle);

        let mut tensor =
            Array4::<f32>::zeros((1, CLASSIFIER_INPUT_SIZE, CLASSIFIER_INPUT_SIZE, 3));
        for (x, y, pixel) in resized.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            tensor[[0, y, x, 0]] = pixel[0] as f32;
            tensor[[0, y, x, 1]] = pixel[1] as f32;
            tensor[[0, y, x, 2]] = pixel[2] as f32;
        }

        tensor
    }
}

/// Index of the largest value; the first wins on ties. Returns 0 for an
/// empty slice.
fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold(0, |best, (i, &v)| if v > values[best] { i } else { best })
}

/// Probability to percentage, rounded to one decimal.
fn confidence_percent(probability: f32) -> f32 {
    (probability * 1000.0).round() / 10.0
}
