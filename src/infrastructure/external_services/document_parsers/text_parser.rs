use async_trait::async_trait;

use crate::application::ports::document_parser::{
    DocumentParseError, DocumentParser, ExtractedContent,
};
use crate::domain::value_objects::DocumentFormat;

/// Plain text and markdown, decoded as UTF-8 with invalid sequences replaced.
#[derive(Debug, Default)]
pub struct TextParser;

impl TextParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentParser for TextParser {
    async fn parse(
        &self,
        data: &[u8],
        format: DocumentFormat,
    ) -> Result<ExtractedContent, DocumentParseError> {
        if format != DocumentFormat::Text {
            return Err(DocumentParseError::UnsupportedFormat(format.to_string()));
        }

        let text = String::from_utf8_lossy(data);

        Ok(ExtractedContent {
            text: text.trim_start_matches('\u{feff}').to_string(),
            tables: Vec::new(),
        })
    }

    fn supported_formats(&self) -> Vec<DocumentFormat> {
        vec![DocumentFormat::Text]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lossy_decoding() {
        let content = TextParser::new()
            .parse(b"\xef\xbb\xbfcaf\xff ok", DocumentFormat::Text)
            .await
            .unwrap();

        assert_eq!(content.text, "caf\u{fffd} ok");
        assert!(content.tables.is_empty());
    }
}
