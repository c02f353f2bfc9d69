//! Normalized vocabulary candidates.

use serde::{Deserialize, Serialize};

/// Why a candidate was emitted in its chosen form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// The dictionary oracle confirmed the emitted form.
    DictionaryValidated,
    /// The lemma differs from the surface and was preferred.
    LemmaNormalized,
    /// Nothing better than the surface form was found.
    SurfaceFallback,
}

impl Reason {
    /// Confidence attached to each reason; strictly decreasing.
    pub fn confidence(self) -> f64 {
        match self {
            Self::DictionaryValidated => 0.99,
            Self::LemmaNormalized => 0.95,
            Self::SurfaceFallback => 0.65,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DictionaryValidated => "dictionary_validated",
            Self::LemmaNormalized => "lemma_normalized",
            Self::SurfaceFallback => "surface_fallback",
        }
    }
}

/// A surface token paired with the form chosen for dictionary lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCandidate {
    /// Token as it appeared in the text.
    pub surface: String,

    /// Form chosen for lookup.
    pub lemma: String,

    /// Name of the normalizer that produced this entry.
    pub method: String,

    /// Confidence in the chosen form (0.0 - 1.0).
    pub confidence: f64,

    /// Why this form was chosen.
    pub reason: Reason,
}

impl NormalizedCandidate {
    pub fn new(
        surface: impl Into<String>,
        lemma: impl Into<String>,
        method: impl Into<String>,
        reason: Reason,
    ) -> Self {
        Self {
            surface: surface.into(),
            lemma: lemma.into(),
            method: method.into(),
            confidence: reason.confidence(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_confidence_ordering() {
        assert!(Reason::DictionaryValidated.confidence() > Reason::LemmaNormalized.confidence());
        assert!(Reason::LemmaNormalized.confidence() > Reason::SurfaceFallback.confidence());
    }

    #[test]
    fn test_serializes_reason_as_snake_case() {
        let candidate = NormalizedCandidate::new("歩か", "歩く", "rule_based", Reason::LemmaNormalized);
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["reason"], "lemma_normalized");
        assert_eq!(json["confidence"], 0.95);
        assert_eq!(json["lemma"], "歩く");
    }
}
