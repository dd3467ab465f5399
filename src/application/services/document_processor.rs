use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{
    DocumentParser, EmbeddingProvider,
    document_parser::{DocumentParseError, ExtractedContent},
};
use crate::application::services::text_chunker::TextChunker;
use crate::domain::entities::{Document, TableChunk, TextChunk};
use crate::domain::repositories::KnowledgeBase;
use crate::domain::value_objects::{ContentHash, DocumentFormat};
use pgvector::Vector;

const EMBEDDING_BATCH_SIZE: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum DocumentProcessingError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Extraction error: {0}")]
    ExtractionError(String),
    #[error("Embedding error: {0}")]
    EmbeddingError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<DocumentParseError> for DocumentProcessingError {
    fn from(error: DocumentParseError) -> Self {
        match error {
            DocumentParseError::UnsupportedFormat(format) => {
                DocumentProcessingError::UnsupportedFormat(format)
            }
            other => DocumentProcessingError::ExtractionError(other.to_string()),
        }
    }
}

/// A file handed over for ingestion under a caller-chosen id.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub document_id: Uuid,
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub document: Document,
    pub text_chunks: usize,
    pub table_chunks: usize,
}

pub struct DocumentProcessorService {
    parser: Arc<dyn DocumentParser>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    knowledge_base: Arc<dyn KnowledgeBase>,
    chunker: TextChunker,
}

impl DocumentProcessorService {
    pub fn new(
        parser: Arc<dyn DocumentParser>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        knowledge_base: Arc<dyn KnowledgeBase>,
        chunker: TextChunker,
    ) -> Self {
        Self {
            parser,
            embedding_provider,
            knowledge_base,
            chunker,
        }
    }

    /// Extracts, chunks and embeds `upload`, then writes it to the knowledge
    /// base in one step. Nothing is stored when any stage fails.
    pub async fn process(
        &self,
        upload: &DocumentUpload,
    ) -> Result<ProcessedDocument, DocumentProcessingError> {
        let format = DocumentFormat::detect(&upload.filename, upload.content_type.as_deref())
            .filter(|format| self.parser.can_parse(*format))
            .ok_or_else(|| {
                DocumentProcessingError::UnsupportedFormat(format!(
                    "{} ({})",
                    upload.filename,
                    upload.content_type.as_deref().unwrap_or("no content type")
                ))
            })?;

        let content = self.parser.parse(&upload.data, format).await?;
        if content.is_empty() {
            return Err(DocumentProcessingError::ExtractionError(format!(
                "No text or tables could be extracted from {}",
                upload.filename
            )));
        }

        let (text_pieces, tables) = self.split_content(content);
        if text_pieces.is_empty() && tables.is_empty() {
            return Err(DocumentProcessingError::ExtractionError(format!(
                "{} contains only blank content",
                upload.filename
            )));
        }

        let text_vectors = self.embed_all(&text_pieces).await?;
        let summaries: Vec<String> = tables.iter().map(|rows| TableChunk::summarize(rows)).collect();
        let table_vectors = self.embed_all(&summaries).await?;

        let text_chunks: Vec<TextChunk> = text_pieces
            .into_iter()
            .zip(text_vectors)
            .enumerate()
            .map(|(index, (text, vector))| {
                TextChunk::new(upload.document_id, index as i32, text, vector)
            })
            .collect();

        let table_chunks: Vec<TableChunk> = tables
            .into_iter()
            .zip(table_vectors)
            .enumerate()
            .map(|(index, (rows, vector))| {
                TableChunk::new(upload.document_id, index as i32, rows, vector)
            })
            .collect();

        let document = Document::new(
            upload.document_id,
            upload.filename.clone(),
            upload.content_type.clone(),
            format,
            ContentHash::of(&upload.data),
            text_chunks.len() as i32,
            table_chunks.len() as i32,
        );

        self.knowledge_base
            .write(&document, &text_chunks, &table_chunks)
            .await
            .map_err(|e| DocumentProcessingError::StorageError(e.to_string()))?;

        tracing::info!(
            "Stored document {} ({}): {} text chunks, {} tables",
            document.id(),
            document.filename(),
            text_chunks.len(),
            table_chunks.len()
        );

        Ok(ProcessedDocument {
            document,
            text_chunks: text_chunks.len(),
            table_chunks: table_chunks.len(),
        })
    }

    fn split_content(&self, content: ExtractedContent) -> (Vec<String>, Vec<Vec<Vec<String>>>) {
        let text_pieces = self.chunker.split(&content.text);
        let tables = content
            .tables
            .into_iter()
            .filter(|table| !table.is_blank())
            .map(|table| table.rows)
            .collect();

        (text_pieces, tables)
    }

    async fn embed_all(&self, inputs: &[String]) -> Result<Vec<Vector>, DocumentProcessingError> {
        let mut vectors = Vec::with_capacity(inputs.len());

        for batch in inputs.chunks(EMBEDDING_BATCH_SIZE) {
            let embedded = self
                .embedding_provider
                .embed_batch(batch)
                .await
                .map_err(|e| DocumentProcessingError::EmbeddingError(e.to_string()))?;

            if embedded.len() != batch.len() {
                return Err(DocumentProcessingError::EmbeddingError(format!(
                    "Expected {} embeddings, received {}",
                    batch.len(),
                    embedded.len()
                )));
            }

            vectors.extend(embedded);
        }

        Ok(vectors)
    }
}
