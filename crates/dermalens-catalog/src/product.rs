//! Product model and per-product filter/normalization rules.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Review score assumed when a product carries neither `reviews_score` nor
/// `rating`.
const DEFAULT_REVIEWS_SCORE: f64 = 4.0;

/// One catalog entry. Only the fields the filter touches are modeled;
/// everything else (ids, image URLs, store links) passes through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Number or numeric string in source catalogs; normalized to a whole
    /// number on output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// True when any keyword is a substring of the lowercased description,
    /// name, or category. Missing fields match as empty strings; an empty
    /// keyword therefore matches every product.
    pub fn matches_any(&self, keywords: &[String]) -> bool {
        let description = lower_or_empty(&self.description);
        let name = lower_or_empty(&self.name);
        let category = lower_or_empty(&self.category);

        keywords.iter().any(|keyword| {
            description.contains(keyword.as_str())
                || name.contains(keyword.as_str())
                || category.contains(keyword.as_str())
        })
    }

    /// Fill in the output-contract fields: `reviews_score` falls back to
    /// `rating` and then to the default; a numeric-string `price` becomes a
    /// whole number (fraction truncated), `0` when unparseable. Numeric
    /// prices are left as-is.
    pub fn normalize_fields(&mut self) {
        if self.reviews_score.is_none() {
            self.reviews_score = Some(self.rating.unwrap_or(DEFAULT_REVIEWS_SCORE));
        }

        if let Some(Value::String(raw)) = &self.price {
            let parsed = raw.trim().parse::<f64>().map(|p| p as i64).unwrap_or(0);
            self.price = Some(Value::from(parsed));
        }
    }
}

fn lower_or_empty(field: &Option<String>) -> String {
    field.as_deref().unwrap_or("").to_lowercase()
}
