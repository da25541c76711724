use async_trait::async_trait;

use crate::lexicon::feedback::CorrectionRecord;
use crate::types::EnrichedListing;

/// Sink for confident enriched listings, consumed downstream for
/// idempotent upsert keyed by content hash.
#[async_trait]
pub trait EnrichedOutputPort: Send + Sync {
    async fn write_enriched(&self, record: &EnrichedListing) -> anyhow::Result<()>;
}

/// Sink for quarantined listings: the manual labeling worksheet.
#[async_trait]
pub trait QuarantineOutputPort: Send + Sync {
    async fn write_quarantined(&self, row: &CorrectionRecord) -> anyhow::Result<()>;
}
