use strsim::normalized_levenshtein;

use super::{Classification, MatchMethod};
use crate::lexicon::BrandLexicon;

/// Confidence assigned to an exact alias hit.
pub const EXACT_MATCH_CONFIDENCE: f64 = 0.95;

/// Resolves the canonical brand for a match-form title.
///
/// Two passes over the lexicon: an exact substring pass in lexicon order,
/// then a fuzzy pass comparing every alias against every whitespace token.
/// When several aliases substring-match, lexicon order decides; that
/// ambiguity is intentional and covered by tests rather than resolved.
pub struct BrandClassifier<'a> {
    lexicon: &'a BrandLexicon,
    /// Minimum similarity ratio (0-100) for a fuzzy token match
    threshold: f64,
}

impl<'a> BrandClassifier<'a> {
    pub fn new(lexicon: &'a BrandLexicon, threshold: f64) -> Self {
        Self { lexicon, threshold }
    }

    pub fn classify(&self, title: &str) -> Classification {
        if title.is_empty() {
            return Classification::unknown();
        }

        // Exact pass: first alias contained in the title wins
        for entry in self.lexicon.entries() {
            for alias in &entry.aliases {
                if !alias.is_empty() && title.contains(alias.as_str()) {
                    return Classification {
                        label: entry.canonical.clone(),
                        confidence: EXACT_MATCH_CONFIDENCE,
                        method: MatchMethod::Exact,
                    };
                }
            }
        }

        // Fuzzy pass: first (alias, token) pair at or above the threshold
        let tokens: Vec<&str> = title.split_whitespace().collect();
        for entry in self.lexicon.entries() {
            for alias in &entry.aliases {
                for token in &tokens {
                    let ratio = normalized_levenshtein(alias, token) * 100.0;
                    if ratio >= self.threshold {
                        return Classification {
                            label: entry.canonical.clone(),
                            confidence: ratio / 100.0,
                            method: MatchMethod::Fuzzy,
                        };
                    }
                }
            }
        }

        Classification::unknown()
    }
}
