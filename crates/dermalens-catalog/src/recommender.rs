//! Catalog loading and the recommendation filter.

use crate::product::Product;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Recommendations are capped at this many products, in catalog order.
const MAX_RECOMMENDATIONS: usize = 6;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Product catalog not found: {0}")]
    NotFound(String),
    #[error("Could not read product catalog {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid product catalog {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The static skin-type to product-list mapping backing the recommender.
#[derive(Debug)]
pub struct Catalog {
    products: HashMap<String, Vec<Product>>,
}

impl Catalog {
    /// Load a catalog from a JSON file: one object whose keys are skin-type
    /// names and whose values are product arrays.
    pub fn load(path: &str) -> Result<Self, CatalogError> {
        if !Path::new(path).exists() {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        let raw = fs::read_to_string(path)
            .map_err(|e| CatalogError::Unreadable { path: path.to_string(), source: e })?;
        let products: HashMap<String, Vec<Product>> = serde_json::from_str(&raw)
            .map_err(|e| CatalogError::Malformed { path: path.to_string(), source: e })?;

        tracing::info!(
            path,
            skin_types = products.len(),
            total_products = products.values().map(Vec::len).sum::<usize>(),
            "loaded product catalog"
        );

        Ok(Self { products })
    }

    /// Build a catalog from in-memory entries.
    pub fn from_entries(products: HashMap<String, Vec<Product>>) -> Self {
        Self { products }
    }

    /// Skin-type keys present in the catalog.
    pub fn skin_types(&self) -> impl Iterator<Item = &str> {
        self.products.keys().map(String::as_str)
    }

    /// Products filed under a skin-type key, if present.
    pub fn products_for(&self, skin_type: &str) -> Option<&[Product]> {
        self.products.get(skin_type).map(Vec::as_slice)
    }

    /// Filter the catalog for a skin type and optional conditions.
    ///
    /// Never fails: unknown keys and missing input come back as error
    /// payloads with the same shape as a success.
    pub fn recommend(&self, skin_type: &str, conditions: &[Value]) -> Recommendations {
        if skin_type.trim().is_empty() {
            return Recommendations::unknown();
        }

        let normalized = normalize_skin_type(skin_type);

        let products = match self.products.get(&normalized) {
            Some(list) if !list.is_empty() => list,
            _ => {
                tracing::debug!(skin_type = %normalized, "no catalog entry");
                return Recommendations::no_entry(normalized);
            }
        };

        let mut selected: Vec<&Product> = if conditions.is_empty() {
            products.iter().collect()
        } else {
            let keywords = condition_keywords(conditions);
            let filtered: Vec<&Product> =
                products.iter().filter(|p| p.matches_any(&keywords)).collect();
            if filtered.is_empty() {
                // A condition mismatch never empties the result: fall back
                // to everything filed under the skin type.
                tracing::debug!(skin_type = %normalized, "no condition matches, using unfiltered list");
                products.iter().collect()
            } else {
                filtered
            }
        };

        selected.truncate(MAX_RECOMMENDATIONS);

        let recommended: Vec<Product> = selected
            .into_iter()
            .cloned()
            .map(|mut product| {
                product.normalize_fields();
                product
            })
            .collect();

        let total = recommended.len();
        tracing::debug!(skin_type = %normalized, total, "recommendations assembled");

        Recommendations {
            recommended_products: recommended,
            skin_type: normalized,
            total_products: total,
            conditions: Some(conditions.to_vec()),
            error: None,
        }
    }
}

/// Wire payload of the recommendation filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    pub recommended_products: Vec<Product>,
    pub skin_type: String,
    pub total_products: usize,
    /// Echo of the caller's condition list; success payloads only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Recommendations {
    fn unknown() -> Self {
        Self {
            recommended_products: Vec::new(),
            skin_type: "Unknown".to_string(),
            total_products: 0,
            conditions: None,
            error: Some("Skin type not provided".to_string()),
        }
    }

    fn no_entry(skin_type: String) -> Self {
        Self {
            recommended_products: Vec::new(),
            error: Some(format!("No products found for skin type: {skin_type}")),
            skin_type,
            total_products: 0,
            conditions: None,
        }
    }
}

/// Trim and capitalize: first character uppercased, the rest lowercased
/// ("OILY" becomes "Oily"). Idempotent, and the only normalization applied
/// before catalog lookup.
pub fn normalize_skin_type(skin_type: &str) -> String {
    let trimmed = skin_type.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// One lowercase keyword per condition entry: the `name` field of an object,
/// the string itself for a bare label, the JSON rendering for anything else.
/// An object without a usable name contributes the empty string, which
/// matches every product.
fn condition_keywords(conditions: &[Value]) -> Vec<String> {
    conditions
        .iter()
        .map(|condition| match condition {
            Value::Object(map) => {
                map.get("name").and_then(Value::as_str).unwrap_or("").to_lowercase()
            }
            Value::String(s) => s.to_lowercase(),
            other => other.to_string().to_lowercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn sample_catalog() -> Catalog {
        let raw = json!({
            "Oily": [
                {
                    "name": "Foaming Gel Cleanser",
                    "description": "Deep-cleans excess oil and unclogs pores",
                    "category": "Cleanser",
                    "price": 18,
                    "rating": 4.5
                },
                {
                    "name": "Oil-Free Moisturizer",
                    "description": "Lightweight hydration",
                    "category": "Moisturizer",
                    "price": "24.99",
                    "rating": 4.2
                },
                {
                    "name": "Clay Detox Mask",
                    "description": "Absorbs excess oil",
                    "category": "Mask",
                    "price": 22
                },
                {
                    "name": "Niacinamide Serum",
                    "description": "Minimizes pores and balances sebum",
                    "category": "Serum",
                    "price": "not listed"
                },
                {
                    "name": "Green Tea Toner",
                    "description": "Refreshes and mattifies",
                    "category": "Toner"
                },
                {
                    "name": "Salicylic Spot Gel",
                    "description": "Targets breakouts overnight",
                    "category": "Treatment",
                    "price": 12,
                    "reviews_score": 4.8
                },
                {
                    "name": "Charcoal Sheet Mask",
                    "description": "Weekly deep clean",
                    "category": "Mask",
                    "price": 9,
                    "rating": 4.0
                }
            ],
            "Dry": [
                {
                    "name": "Ceramide Rich Cream",
                    "description": "Repairs the moisture barrier",
                    "category": "Moisturizer",
                    "price": "34.50",
                    "rating": 4.7
                },
                {
                    "name": "Hyaluronic Serum",
                    "description": "Plumps dehydrated skin",
                    "category": "Serum",
                    "price": 28.0
                }
            ],
            "Sensitive": []
        });
        Catalog::from_entries(serde_json::from_value(raw).unwrap())
    }

    #[test]
    fn test_empty_skin_type() {
        let catalog = sample_catalog();
        for input in ["", "   ", "\t\n"] {
            let rec = catalog.recommend(input, &[]);
            assert!(rec.recommended_products.is_empty());
            assert_eq!(rec.skin_type, "Unknown");
            assert_eq!(rec.total_products, 0);
            assert_eq!(rec.error.as_deref(), Some("Skin type not provided"));
            assert!(rec.conditions.is_none());
        }
    }

    #[test]
    fn test_normalization_idempotent() {
        let catalog = sample_catalog();
        let a = catalog.recommend("OILY", &[]);
        let b = catalog.recommend("oily ", &[]);
        let c = catalog.recommend("Oily", &[]);

        assert_eq!(a.skin_type, "Oily");
        assert_eq!(b.skin_type, "Oily");
        assert_eq!(c.skin_type, "Oily");
        assert_eq!(
            serde_json::to_value(&a.recommended_products).unwrap(),
            serde_json::to_value(&b.recommended_products).unwrap()
        );
        assert_eq!(
            serde_json::to_value(&b.recommended_products).unwrap(),
            serde_json::to_value(&c.recommended_products).unwrap()
        );
    }

    #[test]
    fn test_truncates_to_six() {
        let catalog = sample_catalog();
        let rec = catalog.recommend("Oily", &[]);
        // 7 products in the catalog, capped at 6, catalog order kept
        assert_eq!(rec.recommended_products.len(), 6);
        assert_eq!(rec.total_products, 6);
        assert_eq!(rec.recommended_products[0].name.as_deref(), Some("Foaming Gel Cleanser"));
        assert_eq!(rec.recommended_products[5].name.as_deref(), Some("Salicylic Spot Gel"));
    }

    #[test]
    fn test_condition_filters_products() {
        let catalog = sample_catalog();
        let rec = catalog.recommend("Oily", &[json!({"name": "Excess Oil"})]);
        assert_eq!(rec.recommended_products.len(), 2);
        assert_eq!(rec.recommended_products[0].name.as_deref(), Some("Foaming Gel Cleanser"));
        assert_eq!(rec.recommended_products[1].name.as_deref(), Some("Clay Detox Mask"));
    }

    #[test]
    fn test_condition_matches_name_and_category() {
        let catalog = sample_catalog();
        // "toner" appears only in one product's name and category
        let rec = catalog.recommend("Oily", &[json!("Toner")]);
        assert_eq!(rec.recommended_products.len(), 1);
        assert_eq!(rec.recommended_products[0].name.as_deref(), Some("Green Tea Toner"));
    }

    #[test]
    fn test_zero_match_falls_back_to_unfiltered() {
        let catalog = sample_catalog();
        let unfiltered = catalog.recommend("Oily", &[]);
        let fallback = catalog.recommend("Oily", &[json!({"name": "unicorn tears"})]);

        assert_eq!(
            serde_json::to_value(&fallback.recommended_products).unwrap(),
            serde_json::to_value(&unfiltered.recommended_products).unwrap()
        );
        assert_eq!(fallback.conditions, Some(vec![json!({"name": "unicorn tears"})]));
    }

    #[test]
    fn test_unknown_skin_type() {
        let catalog = sample_catalog();
        let rec = catalog.recommend("Zebra", &[]);
        assert!(rec.recommended_products.is_empty());
        assert_eq!(rec.total_products, 0);
        assert_eq!(rec.skin_type, "Zebra");
        assert_eq!(rec.error.as_deref(), Some("No products found for skin type: Zebra"));

        // Error payloads carry no conditions key at all
        let wire = serde_json::to_value(&rec).unwrap();
        assert!(wire.get("conditions").is_none());
        assert!(wire.get("error").is_some());
    }

    #[test]
    fn test_empty_product_list_treated_as_missing() {
        let catalog = sample_catalog();
        let rec = catalog.recommend("Sensitive", &[]);
        assert_eq!(rec.error.as_deref(), Some("No products found for skin type: Sensitive"));
        assert_eq!(rec.total_products, 0);
    }

    #[test]
    fn test_price_coercion_in_output() {
        let catalog = sample_catalog();
        let rec = catalog.recommend("Oily", &[]);

        let by_name = |name: &str| {
            rec.recommended_products
                .iter()
                .find(|p| p.name.as_deref() == Some(name))
                .unwrap()
        };

        // "24.99" truncates, "not listed" zeroes, plain numbers survive
        assert_eq!(by_name("Oil-Free Moisturizer").price, Some(json!(24)));
        assert_eq!(by_name("Niacinamide Serum").price, Some(json!(0)));
        assert_eq!(by_name("Foaming Gel Cleanser").price, Some(json!(18)));
    }

    #[test]
    fn test_reviews_score_in_output() {
        let catalog = sample_catalog();
        let rec = catalog.recommend("Oily", &[]);

        let by_name = |name: &str| {
            rec.recommended_products
                .iter()
                .find(|p| p.name.as_deref() == Some(name))
                .unwrap()
        };

        assert_eq!(by_name("Foaming Gel Cleanser").reviews_score, Some(4.5));
        assert_eq!(by_name("Green Tea Toner").reviews_score, Some(4.0));
        assert_eq!(by_name("Salicylic Spot Gel").reviews_score, Some(4.8));
    }

    #[test]
    fn test_conditions_echoed_verbatim() {
        let catalog = sample_catalog();
        let conditions = vec![json!("Dryness"), json!({"name": "Flaky"}), json!(5)];
        let rec = catalog.recommend("Dry", &conditions);
        assert_eq!(rec.conditions, Some(conditions));
    }

    #[test]
    fn test_empty_conditions_echoed_as_empty_list() {
        let catalog = sample_catalog();
        let rec = catalog.recommend("Dry", &[]);
        assert_eq!(rec.conditions, Some(vec![]));

        let wire = serde_json::to_value(&rec).unwrap();
        assert_eq!(wire["conditions"], json!([]));
    }

    #[test]
    fn test_catalog_accessors() {
        let catalog = sample_catalog();
        let mut types: Vec<&str> = catalog.skin_types().collect();
        types.sort_unstable();
        assert_eq!(types, vec!["Dry", "Oily", "Sensitive"]);

        assert_eq!(catalog.products_for("Oily").map(<[Product]>::len), Some(7));
        assert!(catalog.products_for("Zebra").is_none());
    }

    #[test]
    fn test_normalize_skin_type() {
        assert_eq!(normalize_skin_type("OILY"), "Oily");
        assert_eq!(normalize_skin_type("oily "), "Oily");
        assert_eq!(normalize_skin_type(" dry"), "Dry");
        assert_eq!(normalize_skin_type("Oily"), "Oily");
        assert_eq!(normalize_skin_type("cOMBINATION"), "Combination");
        assert_eq!(normalize_skin_type(""), "");
    }

    #[test]
    fn test_condition_keywords_extraction() {
        let keywords = condition_keywords(&[
            json!({"name": "Excess Oil", "confidence": 0.85}),
            json!("Dryness"),
            json!({"confidence": 0.5}),
            json!(7),
        ]);
        assert_eq!(keywords, vec!["excess oil", "dryness", "", "7"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load("/nonexistent/skin_products.json").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Product catalog not found: /nonexistent/skin_products.json"
        );
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = Catalog::load(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }));
        assert!(err.to_string().starts_with("Invalid product catalog"));
    }

    #[test]
    fn test_load_and_recommend_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let mut file = std::fs::File::create(&path).unwrap();
        let body = json!({
            "Normal": [
                {"name": "Daily Lotion", "description": "Balanced hydration", "price": "19.99"}
            ]
        });
        file.write_all(body.to_string().as_bytes()).unwrap();

        let catalog = Catalog::load(path.to_str().unwrap()).unwrap();
        let rec = catalog.recommend("normal", &[]);
        assert_eq!(rec.skin_type, "Normal");
        assert_eq!(rec.total_products, 1);
        assert_eq!(rec.recommended_products[0].price, Some(json!(19)));
        assert_eq!(rec.recommended_products[0].reviews_score, Some(4.0));
    }
}
