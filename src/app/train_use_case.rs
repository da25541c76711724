use std::path::Path;
use tracing::info;

use crate::config::LexiconPaths;
use crate::error::Result;
use crate::lexicon::feedback::{self, TrainStats};
use crate::lexicon::LexiconStore;
use crate::observability::metrics;

/// Use case for the offline feedback loop: merge a reviewed worksheet into
/// the lexicons and write a new snapshot for the next pipeline run.
pub struct TrainUseCase {
    lexicon_paths: LexiconPaths,
}

impl TrainUseCase {
    pub fn new(lexicon_paths: LexiconPaths) -> Self {
        Self { lexicon_paths }
    }

    pub fn run<P: AsRef<Path>>(&self, corrections_path: P) -> Result<TrainStats> {
        let mut store = LexiconStore::load(&self.lexicon_paths)?;

        let records = feedback::read_corrections(corrections_path)?;
        info!(rows = records.len(), "Worksheet loaded");

        let stats = feedback::apply_corrections(&mut store, &records);

        metrics::feedback::brand_corrections(stats.brand_corrections as u64);
        metrics::feedback::category_corrections(stats.category_corrections as u64);
        metrics::feedback::entries_created((stats.new_brands + stats.new_categories) as u64);

        store.save(&self.lexicon_paths)?;
        info!("Lexicon snapshot written");

        Ok(stats)
    }
}
