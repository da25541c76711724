use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use crate::app::ports::EnrichedOutputPort;
use crate::error::Result;
use crate::types::EnrichedListing;

/// File-based implementation of EnrichedOutputPort.
/// Writes confident listings to an NDJSON file, one object per line.
pub struct FileEnrichedOutputAdapter {
    file_writer: Mutex<BufWriter<std::fs::File>>,
    file_path: String,
}

impl FileEnrichedOutputAdapter {
    pub fn new(file_path: &str) -> Result<Self> {
        let path = Path::new(file_path);
        let dir = path.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(dir)?;

        info!("Creating enriched output file: {}", file_path);

        let file_writer = BufWriter::new(
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(file_path)?,
        );

        Ok(Self {
            file_writer: Mutex::new(file_writer),
            file_path: file_path.to_string(),
        })
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }
}

#[async_trait::async_trait]
impl EnrichedOutputPort for FileEnrichedOutputAdapter {
    async fn write_enriched(&self, record: &EnrichedListing) -> anyhow::Result<()> {
        let json_line = serde_json::to_string(record)?;

        // Use mutex to ensure thread-safe writing
        let mut writer = self.file_writer.lock().unwrap();
        writeln!(writer, "{}", json_line)?;
        writer.flush()?;

        Ok(())
    }
}
