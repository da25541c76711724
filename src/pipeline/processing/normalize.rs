//! Title normalization: unicode canonicalization, noise removal and the
//! match-form/display-form split.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::config::NormalizerConfig;
use crate::error::{PipelineError, Result};

/// Ordered noise-removal rules. Each rule operates on the previous rule's
/// output, so ordering is part of the contract.
const DEFAULT_NOISE_RULES: &[(&str, &str)] = &[
    // Bracket-enclosed tags: [BPOM], [FLASH SALE], [Official], ...
    (r"\[[^\]]*\]", " "),
    (r"(?i)\([^)]*bpom[^)]*\)", " "),
    (r"(?i)\([^)]*cod[^)]*\)", " "),
    // Promotional phrases
    (
        r"(?i)\b(?:ready\s*stock|beli\s*\d+\s*gratis\s*\d+|flash\s*sale|super\s*brand\s*day)\b",
        " ",
    ),
    (
        r"(?i)\b(?:exclusive|limited|special|terlaris|viral|best\s*seller|cod)\b",
        " ",
    ),
    (r"(?i)\b(?:original|authentic|preloved|new|bekas)\b", " "),
    // Free gift clauses run to the next separator or end of string
    (r"(?i)\b(?:free|gratis|bonus|include|termasuk)\b[^|]*", " "),
    // Decorative symbols
    (r"[️⭐✨🔥💯❤]", " "),
    // Repeated punctuation runs
    (r"!{2,}", " "),
    (r"-{2,}", " "),
];

/// Brand names whose house casing disagrees with plain title casing.
const CASING_OVERRIDES: &[(&str, &str)] = &[
    (r"(?i)\bMs\s+Glow\b", "MS Glow"),
    (r"(?i)\bGlad2Glow\b", "glad2glow"),
];

/// A single compiled (pattern, replacement) noise rule.
#[derive(Debug, Clone)]
pub struct NoiseRule {
    pattern: Regex,
    replacement: String,
}

impl NoiseRule {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            PipelineError::Config(format!("Invalid noise rule pattern '{}': {}", pattern, e))
        })?;
        Ok(Self {
            pattern,
            replacement: replacement.to_string(),
        })
    }
}

/// The two forms a title is normalized into.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedTitle {
    /// Fully lowercased, for classification
    pub match_form: String,
    /// Title-cased with brand-casing fixups, for storage
    pub display_form: String,
}

/// Pure title normalizer: identical input always yields identical output,
/// and absent input yields empty forms rather than an error.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    rules: Vec<NoiseRule>,
    casing_overrides: Vec<(Regex, &'static str)>,
}

impl TextNormalizer {
    /// Normalizer with the built-in rule list.
    pub fn new() -> Self {
        Self::from_config(&NormalizerConfig::default())
            .expect("built-in noise rules must compile")
    }

    /// Normalizer with configured rules appended after the built-in list.
    pub fn from_config(config: &NormalizerConfig) -> Result<Self> {
        let mut rules = Vec::with_capacity(DEFAULT_NOISE_RULES.len() + config.extra_rules.len());
        for (pattern, replacement) in DEFAULT_NOISE_RULES {
            rules.push(NoiseRule::new(pattern, replacement)?);
        }
        for rule in &config.extra_rules {
            rules.push(NoiseRule::new(&rule.pattern, &rule.replacement)?);
        }

        let casing_overrides = CASING_OVERRIDES
            .iter()
            .map(|(pattern, replacement)| {
                (
                    Regex::new(pattern).expect("casing override patterns must compile"),
                    *replacement,
                )
            })
            .collect();

        Ok(Self {
            rules,
            casing_overrides,
        })
    }

    /// Normalize a raw title into its match and display forms.
    pub fn normalize(&self, title: Option<&str>) -> NormalizedTitle {
        let raw = match title {
            Some(t) if !t.trim().is_empty() => t,
            _ => return NormalizedTitle::default(),
        };

        // Canonical composition, then zero-width strip
        let mut text: String = raw.nfc().collect();
        text.retain(|c| !matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}'));

        for rule in &self.rules {
            text = rule
                .pattern
                .replace_all(&text, rule.replacement.as_str())
                .into_owned();
        }

        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

        let match_form = collapsed.to_lowercase();
        let mut display_form = title_case(&collapsed);
        for (pattern, replacement) in &self.casing_overrides {
            display_form = pattern.replace_all(&display_form, *replacement).into_owned();
        }

        NormalizedTitle {
            match_form,
            display_form,
        }
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Title casing that uppercases any letter following a non-letter, so
/// "20ml" becomes "20Ml" and "ms-glow" becomes "Ms-Glow".
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_cased = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(c);
            prev_cased = false;
        }
    }
    out
}
