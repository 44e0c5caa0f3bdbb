//! Skin analysis pipeline.
//!
//! Orchestrates the full photo-to-report flow: decode the image, find the
//! most confident face, crop it with margin, classify the crop, and attach
//! the per-type condition list.

use crate::classifier::{ClassifierError, SkinClassifier};
use crate::detector::{DetectorError, FaceDetector};
use crate::types::{AnalysisReport, FaceBox};
use image::{imageops, RgbImage};
use std::path::Path;
use thiserror::Error;

// --- Named constants ---
/// Minimum detection confidence for a face to be analyzed. Candidates below
/// this are treated as no face at all.
const FACE_CONFIDENCE_THRESHOLD: f32 = 0.9;
/// Pixels of context kept around the detected box before classification.
const FACE_CROP_MARGIN: f32 = 30.0;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Image file not found: {0}")]
    ImageNotFound(String),
    #[error("Could not read image: {path}")]
    ImageUnreadable {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Face not found")]
    FaceNotFound,
    #[error("Failed to crop the face from the image.")]
    FaceCropFailed,
    #[error("Face detector unavailable: {0}")]
    FaceDetectorUnavailable(#[source] DetectorError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Detector(#[from] DetectorError),
}

/// End-to-end skin analyzer: face detector plus skin-type classifier.
#[derive(Debug)]
pub struct SkinAnalyzer {
    classifier: SkinClassifier,
    detector: FaceDetector,
}

impl SkinAnalyzer {
    /// Build an analyzer from a classifier model path and a face detector
    /// model path. The classifier is validated first so a missing model
    /// surfaces its own error rather than a detector one.
    pub fn new(model_path: &str, detector_model_path: &str) -> Result<Self, AnalysisError> {
        let classifier = SkinClassifier::load(model_path)?;
        let detector = FaceDetector::load(detector_model_path)
            .map_err(AnalysisError::FaceDetectorUnavailable)?;

        Ok(Self { classifier, detector })
    }

    /// Analyze the photo at `image_path` and produce a skin report.
    pub fn analyze(&mut self, image_path: &str) -> Result<AnalysisReport, AnalysisError> {
        let rgb = load_rgb(image_path)?;

        let faces = self.detector.detect(&rgb)?;
        let face = select_face(&faces)?;
        tracing::debug!(
            x = face.x,
            y = face.y,
            width = face.width,
            height = face.height,
            confidence = face.confidence,
            "face accepted for analysis"
        );

        let crop = crop_face(&rgb, face).ok_or(AnalysisError::FaceCropFailed)?;
        let prediction = self.classifier.classify(&crop)?;

        let skin_type = prediction.skin_type;
        tracing::info!(%skin_type, confidence = prediction.confidence, "analysis complete");

        Ok(AnalysisReport {
            skin_type,
            confidence: prediction.confidence,
            conditions: skin_type.conditions(),
        })
    }
}

/// Validate and decode an image file into RGB pixels.
fn load_rgb(image_path: &str) -> Result<RgbImage, AnalysisError> {
    if !Path::new(image_path).exists() {
        return Err(AnalysisError::ImageNotFound(image_path.to_string()));
    }

    let image = image::open(image_path).map_err(|e| AnalysisError::ImageUnreadable {
        path: image_path.to_string(),
        source: e,
    })?;

    Ok(image.to_rgb8())
}

/// Pick the face to analyze: the first candidate, which the detector
/// returns sorted by confidence. Low-confidence candidates are rejected
/// outright rather than falling through to the next one.
fn select_face(faces: &[FaceBox]) -> Result<&FaceBox, AnalysisError> {
    match faces.first() {
        Some(face) if face.confidence >= FACE_CONFIDENCE_THRESHOLD => Ok(face),
        _ => Err(AnalysisError::FaceNotFound),
    }
}

/// Crop the detected face with margin. Returns None when the expanded
/// region collapses to nothing (box entirely outside the image).
fn crop_face(image: &RgbImage, face: &FaceBox) -> Option<RgbImage> {
    let (x, y, w, h) = crop_region(face, image.width(), image.height())?;
    Some(imageops::crop_imm(image, x, y, w, h).to_image())
}

/// Expand a face box by the crop margin and clamp it to image bounds.
fn crop_region(face: &FaceBox, img_width: u32, img_height: u32) -> Option<(u32, u32, u32, u32)> {
    let x1 = (face.x - FACE_CROP_MARGIN).max(0.0);
    let y1 = (face.y - FACE_CROP_MARGIN).max(0.0);
    let x2 = (face.x + face.width + FACE_CROP_MARGIN).min(img_width as f32);
    let y2 = (face.y + face.height + FACE_CROP_MARGIN).min(img_height as f32);

    if x2 <= x1 || y2 <= y1 {
        return None;
    }

    let w = (x2 - x1) as u32;
    let h = (y2 - y1) as u32;
    if w == 0 || h == 0 {
        return None;
    }

    Some((x1 as u32, y1 as u32, w, h))
}
