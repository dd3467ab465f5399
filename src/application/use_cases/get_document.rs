use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::Document;
use crate::domain::repositories::{ChunkCounts, KnowledgeBase, KnowledgeBaseError};

#[derive(Debug, thiserror::Error)]
pub enum GetDocumentError {
    #[error("Document not found: {0}")]
    NotFound(Uuid),
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<KnowledgeBaseError> for GetDocumentError {
    fn from(error: KnowledgeBaseError) -> Self {
        GetDocumentError::RepositoryError(error.to_string())
    }
}

/// A document with chunk counts taken from the knowledge base rather than
/// from the document record.
#[derive(Debug, Clone)]
pub struct DocumentDetails {
    pub document: Document,
    pub counts: ChunkCounts,
}

pub struct GetDocumentUseCase {
    knowledge_base: Arc<dyn KnowledgeBase>,
}

impl GetDocumentUseCase {
    pub fn new(knowledge_base: Arc<dyn KnowledgeBase>) -> Self {
        Self { knowledge_base }
    }

    pub async fn execute(&self, document_id: Uuid) -> Result<DocumentDetails, GetDocumentError> {
        let document = self
            .knowledge_base
            .get(document_id)
            .await?
            .ok_or(GetDocumentError::NotFound(document_id))?;

        let counts = self.knowledge_base.count_chunks(document_id).await?;

        Ok(DocumentDetails { document, counts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::document_processor::DocumentUpload;
    use crate::infrastructure::memory::InMemoryKnowledgeBase;
    use crate::testing;

    #[tokio::test]
    async fn test_counts_come_from_the_knowledge_base() {
        let kb = Arc::new(InMemoryKnowledgeBase::new());
        let processed = testing::processor(kb.clone())
            .process(&DocumentUpload {
                document_id: Uuid::new_v4(),
                filename: "sales.csv".to_string(),
                content_type: Some("text/csv".to_string()),
                data: b"region,revenue\nnorth,120\n".to_vec(),
            })
            .await
            .unwrap();

        let details = GetDocumentUseCase::new(kb)
            .execute(processed.document.id())
            .await
            .unwrap();

        assert_eq!(details.counts.text_chunks, 0);
        assert_eq!(details.counts.table_chunks, 1);
        assert_eq!(details.document.filename(), "sales.csv");
    }

    #[tokio::test]
    async fn test_unknown_document() {
        let kb = Arc::new(InMemoryKnowledgeBase::new());
        let id = Uuid::new_v4();

        let result = GetDocumentUseCase::new(kb).execute(id).await;

        assert!(matches!(&result, Err(GetDocumentError::NotFound(missing)) if *missing == id));
        let error = result.err().map(|e| e.to_string());
        assert_eq!(error, Some(format!("Document not found: {}", id)));
    }
}
