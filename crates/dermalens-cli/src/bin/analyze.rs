//! dermalens-analyze: classify skin type from a photo.
//!
//! Emits exactly one JSON document on stdout and always exits 0; the host
//! detects failure by the presence of an `error` key, never the exit code.

use clap::error::ErrorKind;
use clap::Parser;
use dermalens_cli::output::{self, error_payload};
use dermalens_cli::Config;
use dermalens_core::{AnalysisError, AnalysisReport, SkinAnalyzer};

/// Arity failure message, part of the host protocol.
const USAGE_ERROR: &str = "Incorrect number of arguments. Expected model_path and image_path.";

#[derive(Parser)]
#[command(name = "dermalens-analyze", about = "Classify skin type from a photo", version)]
struct Args {
    /// Path to the skin classifier ONNX model.
    model_path: String,
    /// Path to the photo to analyze.
    image_path: String,
}

fn main() {
    output::init_logging();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            tracing::debug!(error = %err, "argument parsing failed");
            output::emit(&error_payload(USAGE_ERROR));
            return;
        }
    };

    let config = Config::from_env();

    match run(&args, &config) {
        Ok(report) => output::emit(&report),
        Err(e) => output::emit(&error_payload(e.to_string())),
    }
}

/// Build the analyzer and run the pipeline over one photo.
fn run(args: &Args, config: &Config) -> Result<AnalysisReport, AnalysisError> {
    let detector_model = config.detector_model_path();
    let mut analyzer = SkinAnalyzer::new(&args.model_path, &detector_model)?;
    analyzer.analyze(&args.image_path)
}
