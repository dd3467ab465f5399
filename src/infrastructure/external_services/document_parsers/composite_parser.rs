use std::sync::Arc;

use async_trait::async_trait;

use super::{CsvParser, DocxParser, PdfParser, TextParser};
use crate::application::ports::document_parser::{
    DocumentParseError, DocumentParser, ExtractedContent,
};
use crate::domain::value_objects::DocumentFormat;

/// Dispatches each format to the parser that handles it.
pub struct CompositeDocumentParser {
    parsers: Vec<Arc<dyn DocumentParser>>,
}

impl CompositeDocumentParser {
    pub fn new() -> Self {
        Self {
            parsers: vec![
                Arc::new(PdfParser::new()),
                Arc::new(DocxParser::new()),
                Arc::new(TextParser::new()),
                Arc::new(CsvParser::new()),
            ],
        }
    }

    fn get_parser_for_format(&self, format: DocumentFormat) -> Option<&Arc<dyn DocumentParser>> {
        self.parsers.iter().find(|parser| parser.can_parse(format))
    }
}

impl Default for CompositeDocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentParser for CompositeDocumentParser {
    async fn parse(
        &self,
        data: &[u8],
        format: DocumentFormat,
    ) -> Result<ExtractedContent, DocumentParseError> {
        let parser = self
            .get_parser_for_format(format)
            .ok_or_else(|| DocumentParseError::UnsupportedFormat(format.to_string()))?;

        parser.parse(data, format).await
    }

    fn supported_formats(&self) -> Vec<DocumentFormat> {
        self.parsers
            .iter()
            .flat_map(|parser| parser.supported_formats())
            .collect()
    }
}
