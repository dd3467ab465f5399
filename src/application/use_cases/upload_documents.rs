use std::sync::Arc;
use uuid::Uuid;

use crate::application::services::document_processor::{
    DocumentProcessingError, DocumentProcessorService, DocumentUpload,
};

#[derive(Debug, thiserror::Error)]
pub enum UploadDocumentsError {
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadDocumentsRequest {
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Success,
    Partial,
    Failed,
}

impl BatchStatus {
    fn from_counts(processed: usize, failed: usize) -> Self {
        match (processed, failed) {
            (0, _) => BatchStatus::Failed,
            (_, 0) => BatchStatus::Success,
            _ => BatchStatus::Partial,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Success => "success",
            BatchStatus::Partial => "partial",
            BatchStatus::Failed => "failed",
        }
    }
}

/// What happened to one file of the batch. Failed files keep the id they
/// were assigned so a client can correlate them, though nothing is stored.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub filename: String,
    pub document_id: Uuid,
    pub text_chunks: usize,
    pub table_chunks: usize,
    pub error: Option<DocumentProcessingError>,
}

impl DocumentOutcome {
    pub fn is_processed(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug)]
pub struct UploadDocumentsResponse {
    pub status: BatchStatus,
    pub documents: Vec<DocumentOutcome>,
}

impl UploadDocumentsResponse {
    pub fn processed_count(&self) -> usize {
        self.documents.iter().filter(|d| d.is_processed()).count()
    }
}

pub struct UploadDocumentsUseCase {
    processor: Arc<DocumentProcessorService>,
}

impl UploadDocumentsUseCase {
    pub fn new(processor: Arc<DocumentProcessorService>) -> Self {
        Self { processor }
    }

    pub async fn execute(
        &self,
        request: UploadDocumentsRequest,
    ) -> Result<UploadDocumentsResponse, UploadDocumentsError> {
        if request.files.is_empty() {
            return Err(UploadDocumentsError::ValidationError(
                "At least one file is required".to_string(),
            ));
        }

        let mut documents = Vec::with_capacity(request.files.len());

        for file in request.files {
            let upload = DocumentUpload {
                document_id: Uuid::new_v4(),
                filename: file.filename,
                content_type: file.content_type,
                data: file.data,
            };

            let outcome = match self.processor.process(&upload).await {
                Ok(processed) => DocumentOutcome {
                    filename: upload.filename,
                    document_id: processed.document.id(),
                    text_chunks: processed.text_chunks,
                    table_chunks: processed.table_chunks,
                    error: None,
                },
                Err(e) => {
                    tracing::warn!("Failed to process {}: {}", upload.filename, e);
                    DocumentOutcome {
                        filename: upload.filename,
                        document_id: upload.document_id,
                        text_chunks: 0,
                        table_chunks: 0,
                        error: Some(e),
                    }
                }
            };

            documents.push(outcome);
        }

        let processed = documents.iter().filter(|d| d.is_processed()).count();
        let status = BatchStatus::from_counts(processed, documents.len() - processed);

        tracing::info!(
            "Upload batch finished: {} of {} documents processed",
            processed,
            documents.len()
        );

        Ok(UploadDocumentsResponse { status, documents })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::KnowledgeBase;
    use crate::infrastructure::memory::InMemoryKnowledgeBase;
    use crate::testing;

    fn file(filename: &str, data: &[u8]) -> UploadedFile {
        UploadedFile {
            filename: filename.to_string(),
            content_type: None,
            data: data.to_vec(),
        }
    }

    fn use_case(kb: Arc<InMemoryKnowledgeBase>) -> UploadDocumentsUseCase {
        UploadDocumentsUseCase::new(Arc::new(testing::processor(kb)))
    }

    #[tokio::test]
    async fn test_batch_reports_each_document() {
        let kb = Arc::new(InMemoryKnowledgeBase::new());
        let response = use_case(kb.clone())
            .execute(UploadDocumentsRequest {
                files: vec![
                    file("sky.txt", b"The sky is blue."),
                    file("deck.pptx", b"binary"),
                ],
            })
            .await
            .unwrap();

        assert_eq!(response.status, BatchStatus::Partial);
        assert_eq!(response.processed_count(), 1);
        assert!(response.documents[0].is_processed());
        assert_eq!(response.documents[0].text_chunks, 1);
        assert!(matches!(
            response.documents[1].error,
            Some(DocumentProcessingError::UnsupportedFormat(_))
        ));

        let stored = kb.list().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id(), response.documents[0].document_id);
    }

    #[tokio::test]
    async fn test_all_failed_batch() {
        let kb = Arc::new(InMemoryKnowledgeBase::new());
        let response = use_case(kb)
            .execute(UploadDocumentsRequest {
                files: vec![file("empty.txt", b"")],
            })
            .await
            .unwrap();

        assert_eq!(response.status, BatchStatus::Failed);
        assert_eq!(response.processed_count(), 0);
    }

    #[tokio::test]
    async fn test_same_payload_twice_gives_two_documents() {
        let kb = Arc::new(InMemoryKnowledgeBase::new());
        let response = use_case(kb.clone())
            .execute(UploadDocumentsRequest {
                files: vec![
                    file("sky.txt", b"The sky is blue."),
                    file("sky.txt", b"The sky is blue."),
                ],
            })
            .await
            .unwrap();

        assert_eq!(response.status, BatchStatus::Success);
        assert_ne!(response.documents[0].document_id, response.documents[1].document_id);
        assert_eq!(kb.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let kb = Arc::new(InMemoryKnowledgeBase::new());
        let result = use_case(kb)
            .execute(UploadDocumentsRequest { files: Vec::new() })
            .await;

        assert!(matches!(result, Err(UploadDocumentsError::ValidationError(_))));
    }
}
