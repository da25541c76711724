//! Confidence gate: decides whether an enriched listing is persisted or
//! quarantined for manual review.

use serde::{Deserialize, Serialize};

use super::classify::Classification;
use crate::types::{EnrichedListing, RawListing};

/// Gate decision for an enriched listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateDecision {
    /// Both labels resolved; proceeds to the confident sink
    Persist,
    /// Held for manual labeling; never silently dropped
    Quarantine,
}

/// Why a listing was quarantined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuarantineReason {
    UnknownBrand,
    UnknownProductType,
    /// A blocklist keyword marks the listing as outside the catalog
    OutOfCatalog { keyword: String },
}

/// Weights for the combined confidence score.
#[derive(Debug, Clone, Copy)]
pub struct GateConfig {
    /// Brand weight; brands are the stronger signal since category
    /// keywords are noisier
    pub brand_weight: f64,
    pub category_weight: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            brand_weight: 0.6,
            category_weight: 0.4,
        }
    }
}

/// Outcome of gating one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOutcome {
    pub decision: GateDecision,
    pub reasons: Vec<QuarantineReason>,
}

/// A fully processed listing, ready for sink routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessedListing {
    pub raw: RawListing,
    pub enriched: EnrichedListing,
    pub outcome: GateOutcome,
}

pub struct ConfidenceGate {
    config: GateConfig,
}

impl ConfidenceGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    pub fn with_weights(brand_weight: f64, category_weight: f64) -> Self {
        Self::new(GateConfig {
            brand_weight,
            category_weight,
        })
    }

    /// Weighted combination of the two classifier confidences. Recorded on
    /// every enriched listing, but the gate itself does not threshold on it.
    pub fn overall_confidence(&self, brand_confidence: f64, category_confidence: f64) -> f64 {
        self.config.brand_weight * brand_confidence + self.config.category_weight * category_confidence
    }

    /// Binary gate: a listing is confident iff both labels resolved and no
    /// blocklist keyword fired.
    pub fn assess(
        &self,
        brand: &Classification,
        category: &Classification,
        blocklist_hit: Option<&str>,
    ) -> GateOutcome {
        let mut reasons = Vec::new();

        if brand.is_unknown() {
            reasons.push(QuarantineReason::UnknownBrand);
        }
        if category.is_unknown() {
            reasons.push(QuarantineReason::UnknownProductType);
        }
        if let Some(keyword) = blocklist_hit {
            reasons.push(QuarantineReason::OutOfCatalog {
                keyword: keyword.to_string(),
            });
        }

        let decision = if reasons.is_empty() {
            GateDecision::Persist
        } else {
            GateDecision::Quarantine
        };

        GateOutcome { decision, reasons }
    }
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::classify::MatchMethod;

    fn known(label: &str, confidence: f64) -> Classification {
        Classification {
            label: label.to_string(),
            confidence,
            method: MatchMethod::Exact,
        }
    }

    #[test]
    fn both_labels_known_persists() {
        let gate = ConfidenceGate::default();
        let outcome = gate.assess(&known("wardah", 0.95), &known("serum", 0.90), None);

        assert_eq!(outcome.decision, GateDecision::Persist);
        assert!(outcome.reasons.is_empty());
    }

    #[test]
    fn unknown_category_quarantines_regardless_of_brand() {
        let gate = ConfidenceGate::default();
        let outcome = gate.assess(&known("wardah", 0.95), &Classification::unknown(), None);

        assert_eq!(outcome.decision, GateDecision::Quarantine);
        assert_eq!(outcome.reasons, vec![QuarantineReason::UnknownProductType]);
    }

    #[test]
    fn unknown_brand_quarantines() {
        let gate = ConfidenceGate::default();
        let outcome = gate.assess(&Classification::unknown(), &known("serum", 0.90), None);

        assert_eq!(outcome.decision, GateDecision::Quarantine);
        assert_eq!(outcome.reasons, vec![QuarantineReason::UnknownBrand]);
    }

    #[test]
    fn blocklist_hit_quarantines_even_when_both_labels_resolve() {
        let gate = ConfidenceGate::default();
        let outcome = gate.assess(
            &known("closeup", 0.95),
            &known("pasta gigi", 0.90),
            Some("pasta gigi"),
        );

        assert_eq!(outcome.decision, GateDecision::Quarantine);
        assert_eq!(
            outcome.reasons,
            vec![QuarantineReason::OutOfCatalog {
                keyword: "pasta gigi".to_string()
            }]
        );
    }

    #[test]
    fn overall_confidence_weights_brand_higher() {
        let gate = ConfidenceGate::default();
        let overall = gate.overall_confidence(0.95, 0.90);
        assert!((overall - 0.93).abs() < 1e-9);
    }

    #[test]
    fn gate_ignores_overall_confidence_value() {
        // Low confidences on known labels still persist: the gate is binary
        let gate = ConfidenceGate::default();
        let outcome = gate.assess(&known("wardah", 0.86), &known("body_care", 0.75), None);
        assert_eq!(outcome.decision, GateDecision::Persist);
    }
}
