//! Product catalog and recommendation filtering.
//!
//! A static JSON catalog maps skin-type keys to product lists; the
//! recommender filters those lists by condition keywords and normalizes
//! the output fields the storefront expects.

pub mod product;
pub mod recommender;

pub use product::Product;
pub use recommender::{Catalog, CatalogError, Recommendations};

use std::path::PathBuf;

/// Default location of the bundled product catalog.
pub fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/skin_products.json")
}
