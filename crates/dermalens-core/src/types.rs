use serde::{Deserialize, Serialize};

/// The four classes of the skin-type classifier, in model output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkinType {
    Acne,
    Dry,
    Normal,
    Oily,
}

impl SkinType {
    /// Classifier head order: softmax index 0..=3.
    pub const CLASSES: [SkinType; 4] =
        [SkinType::Acne, SkinType::Dry, SkinType::Normal, SkinType::Oily];

    /// Map a classifier output index to its skin type.
    pub fn from_class_index(idx: usize) -> Option<SkinType> {
        Self::CLASSES.get(idx).copied()
    }

    /// Capitalized label as it appears in reports ("Acne", "Dry", ...).
    pub fn label(&self) -> &'static str {
        match self {
            SkinType::Acne => "Acne",
            SkinType::Dry => "Dry",
            SkinType::Normal => "Normal",
            SkinType::Oily => "Oily",
        }
    }

    /// Conditions associated with a skin type.
    ///
    /// Derived from the class itself, not the probability vector: each type
    /// maps to one descriptive condition with a fixed confidence.
    pub fn conditions(&self) -> Vec<Condition> {
        match self {
            SkinType::Acne => vec![Condition { name: "Acne Prone".into(), confidence: 0.9 }],
            SkinType::Dry => vec![Condition { name: "Dryness".into(), confidence: 0.85 }],
            SkinType::Normal => vec![Condition { name: "Balanced Skin".into(), confidence: 0.8 }],
            SkinType::Oily => vec![Condition { name: "Excess Oil".into(), confidence: 0.85 }],
        }
    }
}

impl std::fmt::Display for SkinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A skin condition attached to an analysis result. Downstream, condition
/// names double as product-matching keywords.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    pub confidence: f32,
}

/// Bounding box for a detected face, in original image pixel coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
}

/// Final skin analysis result as emitted on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(rename = "skinType")]
    pub skin_type: SkinType,
    /// Winning class probability as a percentage, rounded to one decimal.
    pub confidence: f32,
    pub conditions: Vec<Condition>,
}
