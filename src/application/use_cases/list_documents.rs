use std::sync::Arc;

use crate::domain::entities::Document;
use crate::domain::repositories::{KnowledgeBase, KnowledgeBaseError};

#[derive(Debug, thiserror::Error)]
pub enum ListDocumentsError {
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<KnowledgeBaseError> for ListDocumentsError {
    fn from(error: KnowledgeBaseError) -> Self {
        ListDocumentsError::RepositoryError(error.to_string())
    }
}

pub struct ListDocumentsUseCase {
    knowledge_base: Arc<dyn KnowledgeBase>,
}

impl ListDocumentsUseCase {
    pub fn new(knowledge_base: Arc<dyn KnowledgeBase>) -> Self {
        Self { knowledge_base }
    }

    /// All stored documents, oldest first.
    pub async fn execute(&self) -> Result<Vec<Document>, ListDocumentsError> {
        Ok(self.knowledge_base.list().await?)
    }
}
