use std::sync::Arc;
use uuid::Uuid;

use crate::domain::repositories::{KnowledgeBase, KnowledgeBaseError};

#[derive(Debug, thiserror::Error)]
pub enum DeleteDocumentError {
    #[error("Document not found: {0}")]
    NotFound(Uuid),
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<KnowledgeBaseError> for DeleteDocumentError {
    fn from(error: KnowledgeBaseError) -> Self {
        DeleteDocumentError::RepositoryError(error.to_string())
    }
}

pub struct DeleteDocumentUseCase {
    knowledge_base: Arc<dyn KnowledgeBase>,
}

impl DeleteDocumentUseCase {
    pub fn new(knowledge_base: Arc<dyn KnowledgeBase>) -> Self {
        Self { knowledge_base }
    }

    pub async fn execute(&self, document_id: Uuid) -> Result<(), DeleteDocumentError> {
        if !self.knowledge_base.delete(document_id).await? {
            return Err(DeleteDocumentError::NotFound(document_id));
        }

        tracing::info!("Deleted document {}", document_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::document_processor::DocumentUpload;
    use crate::application::services::qa_orchestrator::QaError;
    use crate::domain::entities::Question;
    use crate::infrastructure::memory::InMemoryKnowledgeBase;
    use crate::testing;

    fn sky(document_id: Uuid) -> DocumentUpload {
        DocumentUpload {
            document_id,
            filename: "sky.txt".to_string(),
            content_type: None,
            data: b"The sky is blue.".to_vec(),
        }
    }

    fn question() -> Question {
        Question::new("What color is the sky?".to_string())
    }

    #[tokio::test]
    async fn test_deleted_document_is_gone_everywhere() {
        let kb = Arc::new(InMemoryKnowledgeBase::new());
        let id = Uuid::new_v4();
        testing::processor(kb.clone()).process(&sky(id)).await.unwrap();

        DeleteDocumentUseCase::new(kb.clone()).execute(id).await.unwrap();

        assert!(kb.list().await.unwrap().is_empty());
        let result = testing::orchestrator(kb).answer(&question()).await;
        assert!(matches!(result, Err(QaError::NoRelevantData)));
    }

    #[tokio::test]
    async fn test_deleting_one_copy_keeps_the_other() {
        let kb = Arc::new(InMemoryKnowledgeBase::new());
        let processor = testing::processor(kb.clone());
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        processor.process(&sky(first)).await.unwrap();
        processor.process(&sky(second)).await.unwrap();

        DeleteDocumentUseCase::new(kb.clone()).execute(first).await.unwrap();

        let remaining = kb.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id(), second);
        let answer = testing::orchestrator(kb).answer(&question()).await.unwrap();
        assert!(answer.text().contains("blue"));
    }

    #[tokio::test]
    async fn test_unknown_document_is_not_found() {
        let kb = Arc::new(InMemoryKnowledgeBase::new());
        let result = DeleteDocumentUseCase::new(kb).execute(Uuid::new_v4()).await;
        assert!(matches!(result, Err(DeleteDocumentError::NotFound(_))));
    }
}
