//! dermalens-recommend: filter the product catalog by skin type and
//! conditions.
//!
//! Emits exactly one JSON document on stdout and always exits 0; the host
//! detects failure by the presence of an `error` key, never the exit code.

use clap::error::ErrorKind;
use clap::Parser;
use dermalens_catalog::Catalog;
use dermalens_cli::output::{self, error_payload};
use dermalens_cli::Config;
use serde_json::Value;

/// Arity failure message, part of the host protocol.
const MISSING_SKIN_TYPE: &str = "Skin type required";

#[derive(Parser)]
#[command(name = "dermalens-recommend", about = "Recommend products for a skin type", version)]
struct Args {
    /// Skin type to look up (e.g. "Oily", "dry", "COMBINATION").
    skin_type: String,
    /// Optional JSON array of conditions: names or {"name": ...} objects.
    conditions: Option<String>,
    /// Trailing arguments, accepted and ignored: hosts historically padded
    /// argv past the two meaningful positions.
    #[arg(hide = true)]
    #[allow(dead_code)]
    rest: Vec<String>,
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
            output::emit(&error_payload(MISSING_SKIN_TYPE));
            return;
        }
    };

    let config = Config::from_env();

    let conditions = match parse_conditions(args.conditions.as_deref()) {
        Ok(conditions) => conditions,
        Err(message) => {
            output::emit(&error_payload(message));
            return;
        }
    };

    let catalog = match Catalog::load(&config.catalog_path.to_string_lossy()) {
        Ok(catalog) => catalog,
        Err(e) => {
            output::emit(&error_payload(e.to_string()));
            return;
        }
    };

    output::emit(&catalog.recommend(&args.skin_type, &conditions));
}

/// Decode the optional conditions argument, which must be a JSON array.
fn parse_conditions(raw: Option<&str>) -> Result<Vec<Value>, String> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    serde_json::from_str::<Vec<Value>>(raw).map_err(|e| format!("Invalid conditions: {e}"))
}
