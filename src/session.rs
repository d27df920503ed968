use crate::export::{self, ExportFormat};
use crate::record::BatchResult;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no prior query for this session")]
    NoPriorQuery,
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Last-query context for one caller. Each map session owns its own value, so
/// concurrent callers can never see each other's results; exporting before any
/// query is a recoverable condition, not a crash.
#[derive(Default)]
pub struct Session {
    last: Option<BatchResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember(&mut self, batch: BatchResult) {
        self.last = Some(batch);
    }

    pub fn last(&self) -> Option<&BatchResult> {
        self.last.as_ref()
    }

    /// Serializes the most recent batch: CSV rows of the records, or the
    /// polygon overlay as GeoJSON.
    pub fn export(&self, format: ExportFormat) -> Result<String, ExportError> {
        let batch = self.last.as_ref().ok_or(ExportError::NoPriorQuery)?;
        match format {
            ExportFormat::Csv => Ok(export::to_csv(&batch.records)),
            ExportFormat::GeoJson => Ok(export::geojson_string(&batch.polygons)?),
        }
    }
}
