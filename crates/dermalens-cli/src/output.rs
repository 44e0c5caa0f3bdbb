//! Process-boundary output: logs on stderr, one JSON document on stdout.

use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr, filtered by `RUST_LOG`.
///
/// Standard output is reserved for the single JSON result document the
/// host parses, so every diagnostic goes to the error stream.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// The shape every failure takes: a single-key error document.
pub fn error_payload(message: impl Into<String>) -> serde_json::Value {
    json!({ "error": message.into() })
}

/// Print the result document to stdout. An encoding failure still produces
/// an error payload rather than aborting the process.
pub fn emit<T: Serialize>(result: &T) {
    match serde_json::to_string(result) {
        Ok(doc) => println!("{doc}"),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode result");
            println!("{}", error_payload(format!("Failed to encode result: {e}")));
        }
    }
}
