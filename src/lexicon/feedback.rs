//! Offline feedback loop: merges human corrections on quarantined records
//! back into the lexicons. Runs strictly between pipeline invocations,
//! never concurrently with classification.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

use crate::constants::UNKNOWN_LABEL;
use crate::error::Result;
use crate::lexicon::{BrandEntry, CategoryEntry, LexiconStore};

/// Priority assigned to categories created from corrections. Reviewers can
/// tighten it later in the lexicon file.
pub const DEFAULT_NEW_CATEGORY_PRIORITY: u32 = 2;

/// One row of the quarantine labeling worksheet.
///
/// The pipeline exports these with empty correction columns; a reviewer fills
/// in `corrected_*` (and optionally the keyword columns) for the rows they can
/// resolve. Empty correction columns mean "no correction".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectionRecord {
    pub content_hash: String,
    pub title_raw: String,
    pub current_brand: String,
    pub current_product_type: String,
    #[serde(default)]
    pub corrected_brand: String,
    #[serde(default)]
    pub corrected_product_type: String,
    #[serde(default)]
    pub key_words_for_brands: String,
    #[serde(default)]
    pub key_words_for_product: String,
}

/// Outcome counts for one training pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainStats {
    pub brand_corrections: usize,
    pub category_corrections: usize,
    pub new_brands: usize,
    pub new_categories: usize,
}

/// Read a filled-in labeling worksheet. A worksheet that cannot be parsed is
/// an input error: nothing is merged from a partially readable file.
pub fn read_corrections<P: AsRef<Path>>(path: P) -> Result<Vec<CorrectionRecord>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: CorrectionRecord = row?;
        records.push(record);
    }
    Ok(records)
}

/// Merge corrections into the store. Alias and keyword merges are set unions
/// over sorted collections, so reapplying the same worksheet is a no-op.
pub fn apply_corrections(store: &mut LexiconStore, records: &[CorrectionRecord]) -> TrainStats {
    let mut stats = TrainStats::default();

    for record in records {
        if let Some(brand) = corrected_label(&record.corrected_brand) {
            merge_brand(store, &brand, &record.key_words_for_brands, &mut stats);
        }

        if let Some(category) = corrected_label(&record.corrected_product_type) {
            merge_category(
                store,
                &category,
                &record.key_words_for_product,
                &record.title_raw,
                &mut stats,
            );
        }
    }

    info!(
        brand_corrections = stats.brand_corrections,
        category_corrections = stats.category_corrections,
        new_brands = stats.new_brands,
        new_categories = stats.new_categories,
        "Corrections merged"
    );

    stats
}

fn merge_brand(store: &mut LexiconStore, brand: &str, keywords_raw: &str, stats: &mut TrainStats) {
    let mut aliases: BTreeSet<String> = split_keywords(keywords_raw).into_iter().collect();
    aliases.insert(brand.to_string());

    // Labels collide case-insensitively: the lexicon holds lowercase
    // canonicals and `corrected_label` lowercases input, so a correction in
    // different casing merges into the existing entry instead of duplicating it.
    match store.brands.entry_mut(brand) {
        Some(entry) => {
            aliases.extend(entry.aliases.iter().cloned());
            entry.aliases = aliases.into_iter().collect();
            stats.brand_corrections += 1;
        }
        None => {
            store.brands.push_entry(BrandEntry {
                canonical: brand.to_string(),
                aliases: aliases.into_iter().collect(),
            });
            stats.brand_corrections += 1;
            stats.new_brands += 1;
            debug!(brand, "Created new brand entry from correction");
        }
    }
}

fn merge_category(
    store: &mut LexiconStore,
    category: &str,
    keywords_raw: &str,
    title_raw: &str,
    stats: &mut TrainStats,
) {
    let mut keywords: BTreeSet<String> = split_keywords(keywords_raw).into_iter().collect();
    if keywords.is_empty() {
        // No keywords supplied: fall back to the first substantial word of
        // the raw title so the new signal still matches something.
        if let Some(word) = fallback_keyword(title_raw) {
            keywords.insert(word);
        }
    }

    match store.categories.entry_mut(category) {
        Some(entry) => {
            keywords.extend(entry.keywords.iter().cloned());
            entry.keywords = keywords.into_iter().collect();
            stats.category_corrections += 1;
        }
        None => {
            store.categories.push_entry(CategoryEntry {
                category: category.to_string(),
                keywords: keywords.into_iter().collect(),
                priority: DEFAULT_NEW_CATEGORY_PRIORITY,
            });
            stats.category_corrections += 1;
            stats.new_categories += 1;
            debug!(category, "Created new category entry from correction");
        }
    }
}

/// A correction counts only when non-empty and not itself "unknown".
fn corrected_label(raw: &str) -> Option<String> {
    let label = raw.trim().to_lowercase();
    if label.is_empty() || label == UNKNOWN_LABEL {
        None
    } else {
        Some(label)
    }
}

fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

fn fallback_keyword(title: &str) -> Option<String> {
    WORD_RE
        .find_iter(&title.to_lowercase())
        .map(|m| m.as_str().to_string())
        .find(|w| w.len() > 3)
}
