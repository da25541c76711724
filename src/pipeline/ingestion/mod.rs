//! Batch ingestion: read raw listing rows, reject malformed ones, derive
//! content identity and drop in-batch duplicates.

pub mod identity;

use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

use crate::config::IdentityConfig;
use crate::error::Result;
use crate::observability::metrics;
use crate::types::RawListing;

/// Counters for one ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub rows_read: usize,
    pub malformed: usize,
    pub duplicates: usize,
    pub accepted: usize,
}

/// The deduplicated batch handed to the enrichment stage.
#[derive(Debug, Clone)]
pub struct IngestedBatch {
    pub listings: Vec<RawListing>,
    pub stats: IngestStats,
}

/// Read a raw listings CSV. An unreadable file is fatal; an unparseable row
/// is counted and skipped, and the batch continues.
pub fn read_batch<P: AsRef<Path>>(path: P, config: &IdentityConfig) -> Result<IngestedBatch> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;

    let mut rows = Vec::new();
    let mut unreadable = 0;
    for row in reader.deserialize::<RawListing>() {
        match row {
            Ok(listing) => rows.push(listing),
            Err(e) => {
                unreadable += 1;
                warn!(error = %e, "Dropping unreadable CSV row");
            }
        }
    }

    let mut batch = ingest_rows(rows, config);
    batch.stats.rows_read += unreadable;
    batch.stats.malformed += unreadable;

    info!(
        rows_read = batch.stats.rows_read,
        malformed = batch.stats.malformed,
        duplicates = batch.stats.duplicates,
        accepted = batch.stats.accepted,
        "Batch ingested"
    );

    Ok(batch)
}

/// Validate rows, assign content identity and deduplicate.
///
/// Dedup keeps the first occurrence of each content hash; later occurrences
/// in the same batch are dropped.
pub fn ingest_rows(rows: Vec<RawListing>, config: &IdentityConfig) -> IngestedBatch {
    let mut stats = IngestStats {
        rows_read: rows.len(),
        ..IngestStats::default()
    };

    let mut seen = HashSet::new();
    let mut listings = Vec::with_capacity(rows.len());

    for mut row in rows {
        if let Err(field) = validate_required_fields(&row) {
            stats.malformed += 1;
            metrics::ingest::record_malformed();
            warn!(field, source = %row.source, "Dropping row with missing required field");
            continue;
        }

        // Storefronts report discounts as percentages; persist fractions
        if row.discount > 1.0 {
            row.discount /= 100.0;
        }

        row.content_hash = identity::listing_identity(&row.name, &row.url, config);

        if !seen.insert(row.content_hash.clone()) {
            stats.duplicates += 1;
            metrics::ingest::record_deduplicated();
            continue;
        }

        listings.push(row);
    }

    stats.accepted = listings.len();
    metrics::ingest::records_read(stats.rows_read as u64);
    metrics::ingest::records_accepted(stats.accepted as u64);

    IngestedBatch { listings, stats }
}

fn validate_required_fields(row: &RawListing) -> std::result::Result<(), &'static str> {
    if row.source.trim().is_empty() {
        return Err("source");
    }
    if row.name.trim().is_empty() {
        return Err("name");
    }
    if row.url.trim().is_empty() {
        return Err("url");
    }
    Ok(())
}
