use async_trait::async_trait;

use crate::domain::value_objects::DocumentFormat;

#[derive(Debug, thiserror::Error)]
pub enum DocumentParseError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Corrupted file: {0}")]
    CorruptedFile(String),
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
}

/// Rows of cell text, header row first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedTable {
    pub rows: Vec<Vec<String>>,
}

impl ExtractedTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// True when no cell holds any text.
    pub fn is_blank(&self) -> bool {
        self.rows
            .iter()
            .flatten()
            .all(|cell| cell.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedContent {
    pub text: String,
    pub tables: Vec<ExtractedTable>,
}

impl ExtractedContent {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.tables.iter().all(ExtractedTable::is_blank)
    }
}

#[async_trait]
pub trait DocumentParser: Send + Sync {
    async fn parse(
        &self,
        data: &[u8],
        format: DocumentFormat,
    ) -> Result<ExtractedContent, DocumentParseError>;

    fn supported_formats(&self) -> Vec<DocumentFormat>;

    fn can_parse(&self, format: DocumentFormat) -> bool {
        self.supported_formats().contains(&format)
    }
}
