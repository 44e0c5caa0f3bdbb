//! Face detection and skin classification engine.
//!
//! Uses UltraFace (version-RFB-320) for face detection and a 4-class
//! EfficientNetB2-export for skin typing, both running via ONNX Runtime
//! for CPU inference.

pub mod analyzer;
pub mod classifier;
pub mod detector;
pub mod quiz;
pub mod types;

pub use analyzer::{AnalysisError, SkinAnalyzer};
pub use types::{AnalysisReport, Condition, FaceBox, SkinType};

use std::path::PathBuf;

/// Default directory searched for bundled ONNX models.
pub fn default_model_dir() -> PathBuf {
    PathBuf::from("models")
}
