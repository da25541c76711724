use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use crate::app::ports::QuarantineOutputPort;
use crate::error::Result;
use crate::lexicon::feedback::CorrectionRecord;

/// File-based implementation of QuarantineOutputPort.
/// Writes quarantined listings as a CSV worksheet whose correction columns
/// are left empty for a reviewer to fill in.
pub struct CsvQuarantineOutputAdapter {
    writer: Mutex<csv::Writer<std::fs::File>>,
    file_path: String,
}

impl CsvQuarantineOutputAdapter {
    pub fn new(file_path: &str) -> Result<Self> {
        let path = Path::new(file_path);
        let dir = path.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(dir)?;

        info!("Creating quarantine worksheet: {}", file_path);

        let writer = csv::Writer::from_path(path)?;

        Ok(Self {
            writer: Mutex::new(writer),
            file_path: file_path.to_string(),
        })
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }
}

#[async_trait::async_trait]
impl QuarantineOutputPort for CsvQuarantineOutputAdapter {
    async fn write_quarantined(&self, row: &CorrectionRecord) -> anyhow::Result<()> {
        let mut writer = self.writer.lock().unwrap();
        writer.serialize(row)?;
        writer.flush()?;
        Ok(())
    }
}
