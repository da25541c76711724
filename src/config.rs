use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Runtime configuration for a pipeline run.
///
/// Everything here is externally supplied policy: match thresholds, the
/// tracking-key denylist, confidence weights, lexicon locations and sink
/// paths. Classification logic itself never hardcodes these.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub classifier: ClassifierConfig,
    pub identity: IdentityConfig,
    pub lexicons: LexiconPaths,
    pub sinks: SinkConfig,
    pub normalizer: NormalizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum token similarity (0-100 scale) for a fuzzy brand match
    pub fuzzy_threshold: f64,
    /// Weight of brand confidence in the combined score
    pub brand_weight: f64,
    /// Weight of category confidence in the combined score
    pub category_weight: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 85.0,
            brand_weight: 0.6,
            category_weight: 0.4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Query keys stripped from listing URLs before hashing
    pub tracking_keys: Vec<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            tracking_keys: [
                "spm",
                "tm",
                "utm_source",
                "utm_medium",
                "utm_campaign",
                "utm_term",
                "utm_content",
                "gclid",
                "fbclid",
                "_keyori",
                "sugg",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LexiconPaths {
    pub brands: String,
    pub categories: String,
}

impl Default for LexiconPaths {
    fn default() -> Self {
        Self {
            brands: "lexicons/brands.json".to_string(),
            categories: "lexicons/categories.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// NDJSON sink for confident enriched listings
    pub enriched: String,
    /// CSV worksheet for quarantined listings awaiting manual labels
    pub quarantine: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            enriched: "output/enriched.ndjson".to_string(),
            quarantine: "output/quarantine_labeling.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Noise rules appended after the built-in rule list, applied in order
    pub extra_rules: Vec<NoiseRuleConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoiseRuleConfig {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

impl Config {
    /// Load configuration from a TOML file. Missing sections fall back to
    /// their defaults; a missing file is a configuration error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
