//! UltraFace face detector via ONNX Runtime.
//!
//! Runs the version-RFB-320 UltraFace model: a lightweight detector that
//! emits per-anchor face scores and corner-form boxes, post-processed with
//! confidence filtering and NMS.

use crate::types::FaceBox;
use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;
use std::path::Path;
use thiserror::Error;

// --- Named constants (no magic numbers) ---
const ULTRAFACE_INPUT_WIDTH: usize = 320;
const ULTRAFACE_INPUT_HEIGHT: usize = 240;
const ULTRAFACE_MEAN: f32 = 127.0;
const ULTRAFACE_STD: f32 = 128.0;
/// Internal candidate cutoff. The analysis pipeline applies its own, much
/// stricter acceptance threshold on top of this.
const ULTRAFACE_CANDIDATE_THRESHOLD: f32 = 0.5;
const ULTRAFACE_NMS_THRESHOLD: f32 = 0.4;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Face detector model not found: {0}")]
    ModelNotFound(String),
    #[error("Face detection failed: {0}")]
    InferenceFailed(String),
    #[error("ort: {0}")]
    Ort(#[from] ort::Error),
}

/// Output tensor indices: (scores_idx, boxes_idx).
type OutputIndices = (usize, usize);

/// UltraFace-based face detector.
#[derive(Debug)]
pub struct FaceDetector {
    session: Session,
    /// (scores, boxes) output positions, discovered by name at load time;
    /// falls back to positional ordering.
    output_indices: OutputIndices,
}

impl FaceDetector {
    /// Load the UltraFace ONNX model from the given path.
    pub fn load(model_path: &str) -> Result<Self, DetectorError> {
        if !Path::new(model_path).exists() {
            return Err(DetectorError::ModelNotFound(model_path.to_string()));
        }

        let session = Session::builder()?
            .with_intra_threads(2)?
            .commit_from_file(model_path)?;

        let output_names: Vec<String> =
            session.outputs().iter().map(|o| o.name().to_string()).collect();
        let num_outputs = output_names.len();

        tracing::info!(
            path = model_path,
            inputs = ?session.inputs().iter().map(|i| (i.name(), i.dtype())).collect::<Vec<_>>(),
            outputs = ?output_names,
            "loaded UltraFace model"
        );

        if num_outputs < 2 {
            return Err(DetectorError::InferenceFailed(format!(
                "UltraFace model requires 2 outputs (scores, boxes), got {num_outputs}"
            )));
        }

        let output_indices = discover_output_indices(&output_names);
        tracing::debug!(?output_indices, "UltraFace output tensor mapping");

        Ok(Self { session, output_indices })
    }

    /// Detect faces in an RGB image, returning bounding boxes in original
    /// image coordinates sorted by confidence descending.
    pub fn detect(&mut self, image: &RgbImage) -> Result<Vec<FaceBox>, DetectorError> {
        let (orig_width, orig_height) = image.dimensions();
        let input = Self::preprocess(image);

        let outputs = self.session.run(ort::inputs![TensorRef::from_array_view(input.view())?])?;

        let (scores_idx, boxes_idx) = self.output_indices;
        let (_, scores) = outputs[scores_idx]
            .try_extract_tensor::<f32>()
            .map_err(|e| DetectorError::InferenceFailed(format!("scores output: {e}")))?;
        let (_, boxes) = outputs[boxes_idx]
            .try_extract_tensor::<f32>()
            .map_err(|e| DetectorError::InferenceFailed(format!("boxes output: {e}")))?;

        let detections = decode_detections(
            scores,
            boxes,
            orig_width as f32,
            orig_height as f32,
            ULTRAFACE_CANDIDATE_THRESHOLD,
        );

        let mut result = nms(detections, ULTRAFACE_NMS_THRESHOLD);
        result.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        tracing::debug!(faces = result.len(), "face detection complete");

        Ok(result)
    }

    /// Preprocess an RGB image into the detector's NCHW float tensor.
    ///
    /// Resizes to 320x240 (UltraFace is trained on stretched input, no
    /// letterboxing) and normalizes to the model's input distribution.
    fn preprocess(image: &RgbImage) -> Array4<f32> {
        let resized = imageops::resize(
            image,
            ULTRAFACE_INPUT_WIDTH as u32,
            ULTRAFACE_INPUT_HEIGHT as u32,
            FilterType::Triangle,
        );

        let mut tensor =
            Array4::<f32>::zeros((1, 3, ULTRAFACE_INPUT_HEIGHT, ULTRAFACE_INPUT_WIDTH));
        for (x, y, pixel) in resized.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            for c in 0..3 {
                tensor[[0, c, y, x]] = (pixel[c] as f32 - ULTRAFACE_MEAN) / ULTRAFACE_STD;
            }
        }

        tensor
    }
}

/// Discover output tensor ordering by name.
///
/// UltraFace exports name their outputs "scores" and "boxes"; some converted
/// models carry generic numeric names instead. Falls back to the standard
/// positional ordering [0]=scores, [1]=boxes when names are not recognized.
fn discover_output_indices(names: &[String]) -> OutputIndices {
    let scores = names.iter().position(|n| n == "scores");
    let boxes = names.iter().position(|n| n == "boxes");

    match (scores, boxes) {
        (Some(s), Some(b)) => {
            tracing::info!("UltraFace: using name-based output tensor mapping");
            (s, b)
        }
        _ => {
            tracing::info!(
                ?names,
                "UltraFace: output names not recognized, using positional mapping [0]=scores, [1]=boxes"
            );
            (0, 1)
        }
    }
}

/// Decode raw score/box tensors into pixel-space detections.
///
/// Scores come as [1, N, 2] (background, face) pairs; boxes as [1, N, 4]
/// corner-form coordinates normalized to [0, 1] of the original image.
fn decode_detections(
    scores: &[f32],
    boxes: &[f32],
    orig_width: f32,
    orig_height: f32,
    threshold: f32,
) -> Vec<FaceBox> {
    let num_anchors = (scores.len() / 2).min(boxes.len() / 4);

    let mut detections = Vec::new();

    for idx in 0..num_anchors {
        let score = scores[idx * 2 + 1];
        if score <= threshold {
            continue;
        }

        let off = idx * 4;
        let x1 = boxes[off] * orig_width;
        let y1 = boxes[off + 1] * orig_height;
        let x2 = boxes[off + 2] * orig_width;
        let y2 = boxes[off + 3] * orig_height;

        detections.push(FaceBox {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
            confidence: score,
        });
    }

    detections
}

/// Non-Maximum Suppression: remove overlapping detections.
fn nms(mut detections: Vec<FaceBox>, iou_threshold: f32) -> Vec<FaceBox> {
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = Vec::new();
    let mut suppressed = vec![false; detections.len()];

    for i in 0..detections.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(detections[i].clone());

        for j in (i + 1)..detections.len() {
            if suppressed[j] {
                continue;
            }
            if iou(&detections[i], &detections[j]) > iou_threshold {
                suppressed[j] = true;
            }
        }
    }

    keep
}

/// Compute Intersection-over-Union between two bounding boxes.
fn iou(a: &FaceBox, b: &FaceBox) -> f32 {
    let x1 = a.x.max(b.x);
    let y1 = a.y.max(b.y);
    let x2 = (a.x + a.width).min(b.x + b.width);
    let y2 = (a.y + a.height).min(b.y + b.height);

    let inter_w = (x2 - x1).max(0.0);
    let inter_h = (y2 - y1).max(0.0);
    let inter_area = inter_w * inter_h;

    let area_a = a.width * a.height;
    let area_b = b.width * b.height;
    let union_area = area_a + area_b - inter_area;

    if union_area > 0.0 {
        inter_area / union_area
    } else {
        0.0
    }
}
