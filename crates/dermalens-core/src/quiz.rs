//! Questionnaire-based skin typing.
//!
//! Fallback for when no photo is available: free-text quiz answers are
//! scored against a fixed keyword table. Substring rules are independent,
//! so one answer may feed several buckets ("dryness" credits both the
//! "dry" and the "dryness" rules).

use crate::types::Condition;
use serde::{Deserialize, Serialize};

/// Score buckets, in tie-break order: on equal scores the later entry wins.
const QUIZ_SKIN_TYPES: [&str; 5] = ["Oily", "Dry", "Combination", "Sensitive", "Normal"];

/// Fixed questionnaire confidence. The quiz is a coarse instrument; it
/// never claims photo-grade certainty.
const QUIZ_CONFIDENCE: f32 = 85.0;
const CONCERN_CONFIDENCE: f32 = 0.8;

/// Keyword rules: (answer substrings, credited type, points).
const QUIZ_RULES: &[(&[&str], &str, i32)] = &[
    (&["tight", "dry"], "Dry", 3),
    (&["oily all over"], "Oily", 3),
    (&["t-zone"], "Combination", 3),
    (&["irritated", "stinging"], "Sensitive", 3),
    (&["comfortable"], "Normal", 2),
    (&["never"], "Dry", 2),
    (&["frequently"], "Oily", 3),
    (&["only in t-zone"], "Combination", 3),
    (&["varies"], "Combination", 1),
    (&["irritated easily", "very sensitive"], "Sensitive", 3),
    (&["breaks out"], "Oily", 2),
    (&["no reaction"], "Normal", 2),
    (&["dryness", "flaking"], "Dry", 3),
    (&["acne", "blackheads"], "Oily", 3),
    (&["large pores"], "Oily", 2),
    (&["sensitivity", "redness"], "Sensitive", 3),
    (&["uneven"], "Normal", 1),
];

/// Quiz result, shaped like the photo-analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizReport {
    #[serde(rename = "skinType")]
    pub skin_type: String,
    pub conditions: Vec<Condition>,
    pub confidence: f32,
}

/// Score free-text answers and return the winning skin-type label.
///
/// Every rule is checked against every lowercased answer; points are
/// additive. Ties go to the later bucket, so an all-miss answer set lands
/// on "Normal".
pub fn score_answers(answers: &[&str]) -> &'static str {
    let mut scores: [(&'static str, i32); 5] = QUIZ_SKIN_TYPES.map(|t| (t, 0));

    for answer in answers {
        let ans = answer.to_lowercase();
        for (keywords, skin_type, points) in QUIZ_RULES {
            if keywords.iter().any(|k| ans.contains(k)) {
                if let Some(entry) = scores.iter_mut().find(|(t, _)| t == skin_type) {
                    entry.1 += points;
                }
            }
        }
    }

    let mut best = scores[0];
    for &(label, score) in &scores[1..] {
        if score >= best.1 {
            best = (label, score);
        }
    }
    best.0
}

/// Build a full quiz report from answers plus the user's stated concerns.
pub fn evaluate(answers: &[&str], concerns: &[&str]) -> QuizReport {
    let skin_type = score_answers(answers).to_string();
    tracing::debug!(%skin_type, answers = answers.len(), "quiz scored");

    QuizReport {
        skin_type,
        conditions: concerns
            .iter()
            .map(|c| Condition { name: (*c).to_string(), confidence: CONCERN_CONFIDENCE })
            .collect(),
        confidence: QUIZ_CONFIDENCE,
    }
}
