use super::{Classification, MatchMethod};
use crate::lexicon::CategoryLexicon;

/// Confidence for a top-precedence (priority 1) keyword hit.
pub const PRIMARY_CONFIDENCE: f64 = 0.90;
/// Confidence for any lower-precedence keyword hit.
pub const SECONDARY_CONFIDENCE: f64 = 0.75;

/// Resolves the canonical product category for a match-form title.
///
/// Collects every keyword that appears in the title, then picks the winner
/// by priority (ascending) and keyword length (descending). Broad keywords
/// carry higher priority integers so specific signals win when both match;
/// longer keywords break ties within a priority as a specificity proxy.
pub struct CategoryClassifier<'a> {
    lexicon: &'a CategoryLexicon,
}

struct Candidate<'a> {
    category: &'a str,
    priority: u32,
    keyword: &'a str,
}

impl<'a> CategoryClassifier<'a> {
    pub fn new(lexicon: &'a CategoryLexicon) -> Self {
        Self { lexicon }
    }

    pub fn classify(&self, title: &str) -> Classification {
        if title.is_empty() {
            return Classification::unknown();
        }

        let mut candidates: Vec<Candidate> = Vec::new();
        for entry in self.lexicon.entries() {
            for keyword in &entry.keywords {
                if !keyword.is_empty() && title.contains(keyword.as_str()) {
                    candidates.push(Candidate {
                        category: &entry.category,
                        priority: entry.priority,
                        keyword,
                    });
                }
            }
        }

        if candidates.is_empty() {
            return Classification::unknown();
        }

        // Stable sort: lexicon order decides between identical
        // (priority, length) candidates
        candidates.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(b.keyword.len().cmp(&a.keyword.len()))
        });

        let winner = &candidates[0];
        let confidence = if winner.priority == 1 {
            PRIMARY_CONFIDENCE
        } else {
            SECONDARY_CONFIDENCE
        };

        Classification {
            label: winner.category.to_string(),
            confidence,
            method: MatchMethod::KeywordRule,
        }
    }

    /// First blocklist keyword found in the title, if any. A hit marks the
    /// listing as out of catalog scope for the gate.
    pub fn blocklist_hit(&self, title: &str) -> Option<&str> {
        self.lexicon
            .blocklist()
            .iter()
            .map(String::as_str)
            .find(|keyword| !keyword.is_empty() && title.contains(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::CategoryEntry;

    fn entry(category: &str, keywords: &[&str], priority: u32) -> CategoryEntry {
        CategoryEntry {
            category: category.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            priority,
        }
    }

    fn lexicon() -> CategoryLexicon {
        CategoryLexicon::new(
            vec![
                entry("body_care", &["body", "body lotion", "lulur"], 3),
                entry("serum", &["serum", "ampoule", "whitening"], 1),
                entry("moisturizer", &["day cream", "cream", "gel"], 2),
            ],
            vec!["sikat gigi".to_string(), "popok".to_string()],
        )
    }

    #[test]
    fn priority_one_wins_with_primary_confidence() {
        let lexicon = lexicon();
        let classifier = CategoryClassifier::new(&lexicon);
        let result = classifier.classify("wardah lightening serum 20ml");

        assert_eq!(result.label, "serum");
        assert_eq!(result.confidence, PRIMARY_CONFIDENCE);
        assert_eq!(result.method, MatchMethod::KeywordRule);
    }

    #[test]
    fn lower_priority_beats_higher_integer_even_on_shorter_keyword() {
        let lexicon = lexicon();
        let classifier = CategoryClassifier::new(&lexicon);
        // "body lotion" (priority 3) and "whitening" (priority 1) both match
        let result = classifier.classify("ms glow whitening body lotion");

        assert_eq!(result.label, "serum");
        assert_eq!(result.confidence, PRIMARY_CONFIDENCE);
    }

    #[test]
    fn longer_keyword_breaks_ties_within_a_priority() {
        let lexicon = lexicon();
        let classifier = CategoryClassifier::new(&lexicon);
        // "day cream" and "cream" are both priority 2; the longer wins
        let result = classifier.classify("nivea day cream 50ml");

        assert_eq!(result.label, "moisturizer");
        assert_eq!(result.confidence, SECONDARY_CONFIDENCE);
    }

    #[test]
    fn no_keyword_match_is_unknown() {
        let lexicon = lexicon();
        let classifier = CategoryClassifier::new(&lexicon);
        let result = classifier.classify("sikat gigi elektrik");

        assert!(result.is_unknown());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.method, MatchMethod::None);
    }

    #[test]
    fn blocklist_flags_out_of_catalog_listings() {
        let lexicon = lexicon();
        let classifier = CategoryClassifier::new(&lexicon);

        assert_eq!(
            classifier.blocklist_hit("sikat gigi elektrik"),
            Some("sikat gigi")
        );
        assert_eq!(classifier.blocklist_hit("wardah serum"), None);
    }

    #[test]
    fn classification_is_deterministic() {
        let lexicon = lexicon();
        let classifier = CategoryClassifier::new(&lexicon);
        let first = classifier.classify("whitening day cream");
        let second = classifier.classify("whitening day cream");
        assert_eq!(first, second);
    }
}
