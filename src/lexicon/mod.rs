//! Brand and category lexicons: the externally maintained dictionaries the
//! classifiers consult. Loaded once per run and treated as immutable for the
//! run's duration; only the offline feedback loop produces new snapshots.

pub mod feedback;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::LexiconPaths;
use crate::error::{PipelineError, Result};

/// One canonical brand and the aliases that resolve to it.
///
/// Lexicons are ordered sequences, not maps: entry order is match precedence
/// when several aliases substring-match the same title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandEntry {
    pub canonical: String,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BrandLexicon {
    entries: Vec<BrandEntry>,
}

impl BrandLexicon {
    pub fn new(entries: Vec<BrandEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[BrandEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup by canonical label.
    pub fn entry_mut(&mut self, canonical: &str) -> Option<&mut BrandEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.canonical.eq_ignore_ascii_case(canonical))
    }

    pub fn push_entry(&mut self, entry: BrandEntry) {
        self.entries.push(entry);
    }

    fn from_json(content: &str, origin: &str) -> Result<Self> {
        let mut entries: Vec<BrandEntry> =
            serde_json::from_str(content).map_err(|e| PipelineError::Lexicon {
                message: format!("Failed to parse brand lexicon {}: {}", origin, e),
            })?;

        for entry in &mut entries {
            normalize_label(&mut entry.canonical);
            for alias in &mut entry.aliases {
                normalize_label(alias);
            }
        }

        check_unique_labels(entries.iter().map(|e| e.canonical.as_str()), origin)?;
        Ok(Self { entries })
    }
}

/// One canonical category: its trigger keywords and its precedence.
/// Lower priority integers win over higher ones when both match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub category: String,
    pub keywords: Vec<String>,
    pub priority: u32,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryLexicon {
    entries: Vec<CategoryEntry>,
    blocklist: Vec<String>,
}

/// On-disk shape of the category lexicon file.
#[derive(Debug, Serialize, Deserialize)]
struct CategoryFile {
    categories: Vec<CategoryEntry>,
    #[serde(default)]
    blocklist: Vec<String>,
}

impl CategoryLexicon {
    pub fn new(entries: Vec<CategoryEntry>, blocklist: Vec<String>) -> Self {
        Self { entries, blocklist }
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    /// Keywords marking listings that are out of catalog scope entirely.
    pub fn blocklist(&self) -> &[String] {
        &self.blocklist
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup by canonical label.
    pub fn entry_mut(&mut self, category: &str) -> Option<&mut CategoryEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.category.eq_ignore_ascii_case(category))
    }

    pub fn push_entry(&mut self, entry: CategoryEntry) {
        self.entries.push(entry);
    }

    fn from_json(content: &str, origin: &str) -> Result<Self> {
        let mut file: CategoryFile =
            serde_json::from_str(content).map_err(|e| PipelineError::Lexicon {
                message: format!("Failed to parse category lexicon {}: {}", origin, e),
            })?;

        for entry in &mut file.categories {
            normalize_label(&mut entry.category);
            for keyword in &mut entry.keywords {
                normalize_label(keyword);
            }
        }
        for keyword in &mut file.blocklist {
            normalize_label(keyword);
        }

        check_unique_labels(file.categories.iter().map(|e| e.category.as_str()), origin)?;
        Ok(Self {
            entries: file.categories,
            blocklist: file.blocklist,
        })
    }
}

/// The lexicon snapshot a run classifies against.
#[derive(Debug, Clone, Default)]
pub struct LexiconStore {
    pub brands: BrandLexicon,
    pub categories: CategoryLexicon,
}

impl LexiconStore {
    /// Load both lexicons. Any unreadable or malformed file aborts the run
    /// before a single record is processed.
    pub fn load(paths: &LexiconPaths) -> Result<Self> {
        let brands = BrandLexicon::from_json(&read_lexicon_file(&paths.brands)?, &paths.brands)?;
        let categories =
            CategoryLexicon::from_json(&read_lexicon_file(&paths.categories)?, &paths.categories)?;

        tracing::info!(
            brands = brands.len(),
            categories = categories.len(),
            "Lexicon store loaded"
        );

        Ok(Self { brands, categories })
    }

    /// Write both lexicons back as a new snapshot. Each file is written to a
    /// temporary sibling and renamed so a crash never leaves a half-written
    /// lexicon behind.
    pub fn save(&self, paths: &LexiconPaths) -> Result<()> {
        let brands_json = serde_json::to_string_pretty(&self.brands.entries)?;
        write_atomic(&paths.brands, &brands_json)?;

        let category_file = CategoryFile {
            categories: self.categories.entries.clone(),
            blocklist: self.categories.blocklist.clone(),
        };
        let categories_json = serde_json::to_string_pretty(&category_file)?;
        write_atomic(&paths.categories, &categories_json)?;

        Ok(())
    }
}

fn read_lexicon_file(path: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| PipelineError::Lexicon {
        message: format!("Failed to read lexicon file '{}': {}", path, e),
    })
}

fn write_atomic(path: &str, content: &str) -> Result<()> {
    let path = Path::new(path);
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Canonical labels, aliases and keywords are matched against the lowercase
/// match-form of titles, so they are held lowercase themselves.
fn normalize_label(label: &mut String) {
    let normalized = label.trim().to_lowercase();
    if normalized != *label {
        *label = normalized;
    }
}

fn check_unique_labels<'a, I>(labels: I, origin: &str) -> Result<()>
where
    I: Iterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    for label in labels {
        if !seen.insert(label.to_string()) {
            return Err(PipelineError::Lexicon {
                message: format!("Duplicate canonical label '{}' in {}", label, origin),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_lexicon_preserves_file_order() {
        let json = r#"[
            {"canonical": "wardah", "aliases": ["wardah", "warda"]},
            {"canonical": "scarlett", "aliases": ["scarlett", "scarlet"]}
        ]"#;
        let lexicon = BrandLexicon::from_json(json, "test").unwrap();
        assert_eq!(lexicon.entries()[0].canonical, "wardah");
        assert_eq!(lexicon.entries()[1].canonical, "scarlett");
    }

    #[test]
    fn labels_are_lowercased_on_load() {
        let json = r#"[{"canonical": "Ms Glow", "aliases": ["MS GLOW", "msglow"]}]"#;
        let lexicon = BrandLexicon::from_json(json, "test").unwrap();
        assert_eq!(lexicon.entries()[0].canonical, "ms glow");
        assert_eq!(lexicon.entries()[0].aliases, vec!["ms glow", "msglow"]);
    }

    #[test]
    fn duplicate_canonical_labels_are_rejected() {
        let json = r#"[
            {"canonical": "wardah", "aliases": []},
            {"canonical": "Wardah", "aliases": []}
        ]"#;
        let err = BrandLexicon::from_json(json, "test").unwrap_err();
        assert!(matches!(err, PipelineError::Lexicon { .. }));
    }

    #[test]
    fn category_lexicon_parses_blocklist() {
        let json = r#"{
            "categories": [
                {"category": "serum", "keywords": ["serum", "ampoule"], "priority": 1}
            ],
            "blocklist": ["sikat gigi", "Pampers"]
        }"#;
        let lexicon = CategoryLexicon::from_json(json, "test").unwrap();
        assert_eq!(lexicon.entries().len(), 1);
        assert_eq!(lexicon.blocklist(), &["sikat gigi", "pampers"]);
    }

    #[test]
    fn malformed_json_is_a_lexicon_error() {
        let err = BrandLexicon::from_json("{not json", "test").unwrap_err();
        assert!(matches!(err, PipelineError::Lexicon { .. }));
    }
}
