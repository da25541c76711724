use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw product listing as captured from a storefront, one row per scraped item.
///
/// Price, rating and sold fields may drift between captures of the same
/// listing; `content_hash` identifies the listing independently of that drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawListing {
    pub source: String,
    pub name: String,
    pub url: String,
    pub image: String,
    pub rating: f64,
    pub sold_quantity: u64,
    pub price_current: f64,
    pub price_original: f64,
    pub discount: f64,
    /// Stable content identity, derived at ingestion from name + canonical URL.
    #[serde(default)]
    pub content_hash: String,
}

/// Brand/category-tagged record produced by the enrichment stage,
/// one-to-one with a RawListing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedListing {
    pub content_hash: String,
    /// Display-form title (title-cased, brand casing fixed up)
    pub title_cleaned: String,
    /// Canonical brand key, or "unknown"
    pub brand: String,
    /// Canonical category key, or "unknown"
    pub product_type: String,
    pub brand_confidence: f64,
    pub product_type_confidence: f64,
    /// Weighted combination of the two classifier confidences. Recorded for
    /// analytics; the persistence gate itself is binary on known/unknown.
    pub overall_confidence: f64,
    pub price_effective: f64,
    /// When this record was enriched
    pub enriched_at: DateTime<Utc>,
}
