use anyhow::Result;
use rayon::prelude::*;
use tracing::info;

use crate::app::ports::{EnrichedOutputPort, QuarantineOutputPort};
use crate::config::Config;
use crate::lexicon::feedback::CorrectionRecord;
use crate::lexicon::LexiconStore;
use crate::observability::metrics;
use crate::pipeline::processing::classify::brand::BrandClassifier;
use crate::pipeline::processing::classify::category::CategoryClassifier;
use crate::pipeline::processing::normalize::TextNormalizer;
use crate::pipeline::processing::quality_gate::{
    AssessedListing, ConfidenceGate, GateDecision,
};
use crate::types::{EnrichedListing, RawListing};

/// Use case for enriching a batch of deduplicated raw listings and routing
/// each record to the confident or quarantine sink.
///
/// Per-record work is pure relative to the lexicon snapshot held here, so
/// the batch is classified in parallel and reassembled in input order.
pub struct EnrichUseCase {
    normalizer: TextNormalizer,
    store: LexiconStore,
    gate: ConfidenceGate,
    fuzzy_threshold: f64,
    enriched_output: Box<dyn EnrichedOutputPort>,
    quarantine_output: Box<dyn QuarantineOutputPort>,
}

/// Counters for one enrichment batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub total: usize,
    pub persisted: usize,
    pub quarantined: usize,
}

impl EnrichUseCase {
    pub fn new(
        config: &Config,
        store: LexiconStore,
        enriched_output: Box<dyn EnrichedOutputPort>,
        quarantine_output: Box<dyn QuarantineOutputPort>,
    ) -> crate::error::Result<Self> {
        Ok(Self {
            normalizer: TextNormalizer::from_config(&config.normalizer)?,
            store,
            gate: ConfidenceGate::with_weights(
                config.classifier.brand_weight,
                config.classifier.category_weight,
            ),
            fuzzy_threshold: config.classifier.fuzzy_threshold,
            enriched_output,
            quarantine_output,
        })
    }

    /// Enrich a single listing: normalize, classify, gate. Pure per record;
    /// a title that fails to classify degrades to "unknown", never an error.
    pub fn enrich_listing(&self, raw: &RawListing) -> AssessedListing {
        let title = self.normalizer.normalize(Some(&raw.name));

        let brand_classifier = BrandClassifier::new(&self.store.brands, self.fuzzy_threshold);
        let category_classifier = CategoryClassifier::new(&self.store.categories);

        let brand = brand_classifier.classify(&title.match_form);
        let category = category_classifier.classify(&title.match_form);
        let blocklist_hit = category_classifier.blocklist_hit(&title.match_form);

        metrics::classify::brand_result(&brand);
        metrics::classify::category_result(&category);
        if blocklist_hit.is_some() {
            metrics::classify::blocklist_hit();
        }

        let outcome = self.gate.assess(&brand, &category, blocklist_hit);
        let overall_confidence = self
            .gate
            .overall_confidence(brand.confidence, category.confidence);
        metrics::gate::overall_confidence(overall_confidence);

        let enriched = EnrichedListing {
            content_hash: raw.content_hash.clone(),
            title_cleaned: title.display_form,
            brand: brand.label,
            product_type: category.label,
            brand_confidence: brand.confidence,
            product_type_confidence: category.confidence,
            overall_confidence,
            price_effective: raw.price_current,
            enriched_at: chrono::Utc::now(),
        };

        AssessedListing {
            raw: raw.clone(),
            enriched,
            outcome,
        }
    }

    /// Enrich the whole batch and write both sinks.
    pub async fn run_batch(&self, listings: &[RawListing]) -> Result<EnrichSummary> {
        let assessed: Vec<AssessedListing> = listings
            .par_iter()
            .map(|listing| self.enrich_listing(listing))
            .collect();

        let mut summary = EnrichSummary {
            total: assessed.len(),
            ..EnrichSummary::default()
        };

        for record in &assessed {
            match record.outcome.decision {
                GateDecision::Persist => {
                    self.enriched_output.write_enriched(&record.enriched).await?;
                    metrics::gate::record_persisted();
                    summary.persisted += 1;
                }
                GateDecision::Quarantine => {
                    self.quarantine_output
                        .write_quarantined(&worksheet_row(record))
                        .await?;
                    metrics::gate::record_quarantined();
                    summary.quarantined += 1;
                }
            }
        }

        info!(
            total = summary.total,
            persisted = summary.persisted,
            quarantined = summary.quarantined,
            "Enrichment batch complete"
        );

        Ok(summary)
    }
}

/// A quarantined record exported verbatim with its current guesses; the
/// correction columns stay empty for the reviewer.
fn worksheet_row(record: &AssessedListing) -> CorrectionRecord {
    CorrectionRecord {
        content_hash: record.enriched.content_hash.clone(),
        title_raw: record.raw.name.clone(),
        current_brand: record.enriched.brand.clone(),
        current_product_type: record.enriched.product_type.clone(),
        ..CorrectionRecord::default()
    }
}
