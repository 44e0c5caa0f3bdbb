use std::path::PathBuf;

/// File name of the face detector model inside the model directory.
pub const DETECTOR_MODEL_FILE: &str = "version-RFB-320.onnx";

/// Tool configuration, loaded from environment variables.
pub struct Config {
    /// Directory containing bundled ONNX model files (the face detector
    /// lives here; the classifier model path comes from the command line).
    pub model_dir: PathBuf,
    /// Path to the product catalog JSON file.
    pub catalog_path: PathBuf,
}

impl Config {
    /// Load configuration from `DERMALENS_*` environment variables with
    /// defaults.
    pub fn from_env() -> Self {
        let model_dir = std::env::var("DERMALENS_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dermalens_core::default_model_dir());

        let catalog_path = std::env::var("DERMALENS_CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dermalens_catalog::default_catalog_path());

        Self { model_dir, catalog_path }
    }

    /// Path to the UltraFace detection model.
    pub fn detector_model_path(&self) -> String {
        self.model_dir
            .join(DETECTOR_MODEL_FILE)
            .to_string_lossy()
            .into_owned()
    }
}
