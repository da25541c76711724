//! Metrics for the enrichment pipeline, recorded through the `metrics`
//! facade. The binary installs no exporter itself; a recorder can be
//! installed by whatever embeds the pipeline.

use std::fmt;

/// All metric names used in the system, to avoid magic strings at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Ingestion
    IngestRowsRead,
    IngestRowsAccepted,
    IngestMalformed,
    IngestDeduplicated,

    // Classification
    ClassifyBrandExact,
    ClassifyBrandFuzzy,
    ClassifyBrandMiss,
    ClassifyCategoryMatched,
    ClassifyCategoryMiss,
    ClassifyBlocklistHit,

    // Gate
    GateRecordsPersisted,
    GateRecordsQuarantined,
    GateOverallConfidence,

    // Feedback loop
    FeedbackBrandCorrections,
    FeedbackCategoryCorrections,
    FeedbackEntriesCreated,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::IngestRowsRead => "enrich_ingest_rows_read_total",
            MetricName::IngestRowsAccepted => "enrich_ingest_rows_accepted_total",
            MetricName::IngestMalformed => "enrich_ingest_malformed_total",
            MetricName::IngestDeduplicated => "enrich_ingest_deduplicated_total",

            MetricName::ClassifyBrandExact => "enrich_classify_brand_exact_total",
            MetricName::ClassifyBrandFuzzy => "enrich_classify_brand_fuzzy_total",
            MetricName::ClassifyBrandMiss => "enrich_classify_brand_miss_total",
            MetricName::ClassifyCategoryMatched => "enrich_classify_category_matched_total",
            MetricName::ClassifyCategoryMiss => "enrich_classify_category_miss_total",
            MetricName::ClassifyBlocklistHit => "enrich_classify_blocklist_hit_total",

            MetricName::GateRecordsPersisted => "enrich_gate_records_persisted_total",
            MetricName::GateRecordsQuarantined => "enrich_gate_records_quarantined_total",
            MetricName::GateOverallConfidence => "enrich_gate_overall_confidence",

            MetricName::FeedbackBrandCorrections => "enrich_feedback_brand_corrections_total",
            MetricName::FeedbackCategoryCorrections => "enrich_feedback_category_corrections_total",
            MetricName::FeedbackEntriesCreated => "enrich_feedback_entries_created_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub mod ingest {
    use super::MetricName;

    pub fn records_read(count: u64) {
        ::metrics::counter!(MetricName::IngestRowsRead.as_str()).increment(count);
    }

    pub fn records_accepted(count: u64) {
        ::metrics::counter!(MetricName::IngestRowsAccepted.as_str()).increment(count);
    }

    pub fn record_malformed() {
        ::metrics::counter!(MetricName::IngestMalformed.as_str()).increment(1);
    }

    pub fn record_deduplicated() {
        ::metrics::counter!(MetricName::IngestDeduplicated.as_str()).increment(1);
    }
}

pub mod classify {
    use super::MetricName;
    use crate::pipeline::processing::classify::{Classification, MatchMethod};

    /// Record the outcome of one brand classification
    pub fn brand_result(result: &Classification) {
        let name = match result.method {
            MatchMethod::Exact => MetricName::ClassifyBrandExact,
            MatchMethod::Fuzzy => MetricName::ClassifyBrandFuzzy,
            _ => MetricName::ClassifyBrandMiss,
        };
        ::metrics::counter!(name.as_str()).increment(1);
    }

    /// Record the outcome of one category classification
    pub fn category_result(result: &Classification) {
        let name = if result.is_unknown() {
            MetricName::ClassifyCategoryMiss
        } else {
            MetricName::ClassifyCategoryMatched
        };
        ::metrics::counter!(name.as_str()).increment(1);
    }

    pub fn blocklist_hit() {
        ::metrics::counter!(MetricName::ClassifyBlocklistHit.as_str()).increment(1);
    }
}

pub mod gate {
    use super::MetricName;

    pub fn record_persisted() {
        ::metrics::counter!(MetricName::GateRecordsPersisted.as_str()).increment(1);
    }

    pub fn record_quarantined() {
        ::metrics::counter!(MetricName::GateRecordsQuarantined.as_str()).increment(1);
    }

    pub fn overall_confidence(score: f64) {
        ::metrics::histogram!(MetricName::GateOverallConfidence.as_str()).record(score);
    }
}

pub mod feedback {
    use super::MetricName;

    pub fn brand_corrections(count: u64) {
        ::metrics::counter!(MetricName::FeedbackBrandCorrections.as_str()).increment(count);
    }

    pub fn category_corrections(count: u64) {
        ::metrics::counter!(MetricName::FeedbackCategoryCorrections.as_str()).increment(count);
    }

    pub fn entries_created(count: u64) {
        ::metrics::counter!(MetricName::FeedbackEntriesCreated.as_str()).increment(count);
    }
}
