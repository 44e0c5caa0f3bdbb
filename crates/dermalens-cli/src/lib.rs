//! Shared plumbing for the dermalens command-line tools.

pub mod config;
pub mod output;

pub use config::Config;
