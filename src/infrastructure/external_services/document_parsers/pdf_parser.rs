use async_trait::async_trait;
use lopdf::Document;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::application::ports::document_parser::{
    DocumentParseError, DocumentParser, ExtractedContent,
};
use crate::domain::value_objects::DocumentFormat;

/// Extracts page text with lopdf. Tables are not recovered from PDFs.
#[derive(Debug, Default)]
pub struct PdfParser;

impl PdfParser {
    pub fn new() -> Self {
        Self
    }

    fn extract(data: &[u8]) -> Result<ExtractedContent, DocumentParseError> {
        let doc = Document::load_mem(data)
            .map_err(|e| DocumentParseError::CorruptedFile(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(DocumentParseError::ExtractionFailed(
                "Encrypted PDFs are not supported".to_string(),
            ));
        }

        let pages = doc.get_pages();
        tracing::debug!("Extracting text from {} PDF pages", pages.len());

        let mut extracted: Vec<(u32, Result<String, String>)> = pages
            .into_par_iter()
            .map(|(page_num, _)| {
                let text = doc
                    .extract_text(&[page_num])
                    .map_err(|e| format!("page {}: {}", page_num, e));
                (page_num, text)
            })
            .collect();
        extracted.sort_by_key(|(page_num, _)| *page_num);

        let mut lines = Vec::new();
        for (page_num, result) in extracted {
            match result {
                Ok(text) => lines.extend(
                    text.split('\n')
                        .map(|line| line.trim_end().to_string())
                        .filter(|line| !line.is_empty()),
                ),
                Err(e) => tracing::warn!("Skipping PDF page {}: {}", page_num, e),
            }
        }

        Ok(ExtractedContent {
            text: lines.join("\n"),
            tables: Vec::new(),
        })
    }
}

#[async_trait]
impl DocumentParser for PdfParser {
    async fn parse(
        &self,
        data: &[u8],
        format: DocumentFormat,
    ) -> Result<ExtractedContent, DocumentParseError> {
        if format != DocumentFormat::Pdf {
            return Err(DocumentParseError::UnsupportedFormat(format.to_string()));
        }

        let data = data.to_vec();
        tokio::task::spawn_blocking(move || Self::extract(&data))
            .await
            .map_err(|e| DocumentParseError::ExtractionFailed(e.to_string()))?
    }

    fn supported_formats(&self) -> Vec<DocumentFormat> {
        vec![DocumentFormat::Pdf]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_is_a_corrupted_file() {
        let result = PdfParser::new()
            .parse(b"%PDF-1.4 this is not really a pdf", DocumentFormat::Pdf)
            .await;

        assert!(matches!(result, Err(DocumentParseError::CorruptedFile(_))));
    }

    #[tokio::test]
    async fn test_rejects_other_formats() {
        let result = PdfParser::new().parse(b"hello", DocumentFormat::Text).await;
        assert!(matches!(result, Err(DocumentParseError::UnsupportedFormat(_))));
    }
}
