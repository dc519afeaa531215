use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved key holding the flat base score added once to every total.
pub const BASE_SCORE_KEY: &str = "temel_puan";

/// Per-subject weights applied to net scores.
///
/// Stored as a flat JSON object; the reserved `temel_puan` entry is the base score:
/// ```json
/// { "Türkçe": 4, "Matematik": 4, "Fen Bilimleri": 4, "temel_puan": 194.75 }
/// ```
/// A non-numeric weight fails deserialization, which fails the whole request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoefficientTable {
    pub weights: BTreeMap<String, f64>,
}

impl CoefficientTable {
    /// Weight for a subject (0.0 when the subject has no entry)
    pub fn weight(&self, subject: &str) -> f64 {
        self.weights.get(subject).copied().unwrap_or(0.0)
    }

    /// Base score added to every total (0.0 when absent)
    pub fn base_score(&self) -> f64 {
        self.weights.get(BASE_SCORE_KEY).copied().unwrap_or(0.0)
    }

    pub fn with_weight(mut self, subject: &str, weight: f64) -> Self {
        self.weights.insert(subject.to_string(), weight);
        self
    }

    pub fn with_base_score(self, base: f64) -> Self {
        self.with_weight(BASE_SCORE_KEY, base)
    }

    /// Multiply every weight, base score included
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            weights: self
                .weights
                .iter()
                .map(|(k, v)| (k.clone(), v * factor))
                .collect(),
        }
    }
}
