use async_trait::async_trait;

use crate::application::ports::document_parser::{
    DocumentParseError, DocumentParser, ExtractedContent, ExtractedTable,
};
use crate::domain::value_objects::DocumentFormat;

/// A CSV file is one table, header row first, with no prose.
#[derive(Debug, Default)]
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentParser for CsvParser {
    async fn parse(
        &self,
        data: &[u8],
        format: DocumentFormat,
    ) -> Result<ExtractedContent, DocumentParseError> {
        if format != DocumentFormat::Csv {
            return Err(DocumentParseError::UnsupportedFormat(format.to_string()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut rows = Vec::new();
        for result in reader.byte_records() {
            let record = result.map_err(|e| DocumentParseError::CorruptedFile(e.to_string()))?;
            let row: Vec<String> = record
                .iter()
                .map(|field| String::from_utf8_lossy(field).trim().to_string())
                .collect();

            if row.iter().any(|cell| !cell.is_empty()) {
                rows.push(row);
            }
        }

        let tables = if rows.is_empty() {
            Vec::new()
        } else {
            vec![ExtractedTable::new(rows)]
        };

        Ok(ExtractedContent {
            text: String::new(),
            tables,
        })
    }

    fn supported_formats(&self) -> Vec<DocumentFormat> {
        vec![DocumentFormat::Csv]
    }
}
