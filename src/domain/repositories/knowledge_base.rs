use async_trait::async_trait;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::{Document, TableChunk, TextChunk};
use crate::domain::value_objects::ChunkKind;

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeBaseError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Document already exists: {0}")]
    DuplicateDocument(Uuid),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChunkContent {
    Text(TextChunk),
    Table(TableChunk),
}

/// One similarity search result with the owning document attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkHit {
    pub content: ChunkContent,
    pub document_id: Uuid,
    pub filename: String,
    /// Cosine similarity, higher is closer.
    pub similarity: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkCounts {
    pub text_chunks: i64,
    pub table_chunks: i64,
}

/// Persistent store of documents and their embedded chunks.
///
/// `write` and `delete` are all-or-nothing per document: a reader never
/// observes a document without its chunks, or chunks of a deleted document.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn write(
        &self,
        document: &Document,
        text_chunks: &[TextChunk],
        table_chunks: &[TableChunk],
    ) -> Result<(), KnowledgeBaseError>;

    /// The `k` chunks of `kind` closest to `embedding`, best first.
    async fn query(
        &self,
        embedding: &Vector,
        k: usize,
        kind: ChunkKind,
    ) -> Result<Vec<ChunkHit>, KnowledgeBaseError>;

    /// All documents, oldest first.
    async fn list(&self) -> Result<Vec<Document>, KnowledgeBaseError>;

    async fn get(&self, document_id: Uuid) -> Result<Option<Document>, KnowledgeBaseError>;

    /// Returns `false` when no document has this id.
    async fn delete(&self, document_id: Uuid) -> Result<bool, KnowledgeBaseError>;

    async fn count_chunks(&self, document_id: Uuid) -> Result<ChunkCounts, KnowledgeBaseError>;
}

/// Checks the ownership invariants a write must satisfy before anything is
/// stored.
pub fn validate_write(
    document: &Document,
    text_chunks: &[TextChunk],
    table_chunks: &[TableChunk],
) -> Result<(), KnowledgeBaseError> {
    if let Some(stray) = text_chunks.iter().find(|c| !c.belongs_to(document.id())) {
        return Err(KnowledgeBaseError::ValidationError(format!(
            "Text chunk {} belongs to document {}, not {}",
            stray.id(),
            stray.document_id(),
            document.id()
        )));
    }

    if let Some(stray) = table_chunks.iter().find(|c| !c.belongs_to(document.id())) {
        return Err(KnowledgeBaseError::ValidationError(format!(
            "Table chunk {} belongs to document {}, not {}",
            stray.id(),
            stray.document_id(),
            document.id()
        )));
    }

    if document.text_chunk_count() as usize != text_chunks.len()
        || document.table_chunk_count() as usize != table_chunks.len()
    {
        return Err(KnowledgeBaseError::ValidationError(format!(
            "Document {} declares {} text and {} table chunks but {} and {} were supplied",
            document.id(),
            document.text_chunk_count(),
            document.table_chunk_count(),
            text_chunks.len(),
            table_chunks.len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ContentHash, DocumentFormat};

    fn document(text: i32, table: i32) -> Document {
        Document::new(
            Uuid::new_v4(),
            "doc.txt".to_string(),
            None,
            DocumentFormat::Text,
            ContentHash::of(b"doc"),
            text,
            table,
        )
    }

    #[test]
    fn test_valid_write_passes() {
        let doc = document(1, 0);
        let chunk = TextChunk::new(doc.id(), 0, "hello".to_string(), Vector::from(vec![1.0]));
        assert!(validate_write(&doc, &[chunk], &[]).is_ok());
    }

    #[test]
    fn test_foreign_chunk_is_rejected() {
        let doc = document(1, 0);
        let chunk = TextChunk::new(Uuid::new_v4(), 0, "hello".to_string(), Vector::from(vec![1.0]));
        assert!(matches!(
            validate_write(&doc, &[chunk], &[]),
            Err(KnowledgeBaseError::ValidationError(_))
        ));
    }

    #[test]
    fn test_count_mismatch_is_rejected() {
        let doc = document(2, 0);
        let chunk = TextChunk::new(doc.id(), 0, "hello".to_string(), Vector::from(vec![1.0]));
        assert!(validate_write(&doc, &[chunk], &[]).is_err());
    }
}
