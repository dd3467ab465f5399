use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::application::use_cases::{DocumentDetails, DocumentOutcome, UploadDocumentsResponse};
use crate::domain::entities::Document;
use crate::presentation::http::errors::processing_error_code;

#[derive(Debug, Serialize)]
pub struct DocumentErrorDto {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ProcessedDocumentDto {
    pub filename: String,
    pub document_id: Uuid,
    pub text_chunks: usize,
    pub table_chunks: usize,
    pub status: String,
    pub error: Option<DocumentErrorDto>,
}

impl From<DocumentOutcome> for ProcessedDocumentDto {
    fn from(outcome: DocumentOutcome) -> Self {
        let status = if outcome.is_processed() { "processed" } else { "failed" };

        Self {
            filename: outcome.filename,
            document_id: outcome.document_id,
            text_chunks: outcome.text_chunks,
            table_chunks: outcome.table_chunks,
            status: status.to_string(),
            error: outcome.error.map(|e| DocumentErrorDto {
                code: processing_error_code(&e).to_string(),
                message: e.to_string(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadDocumentsResponseDto {
    pub status: String,
    pub processed_documents: Vec<ProcessedDocumentDto>,
}

impl From<UploadDocumentsResponse> for UploadDocumentsResponseDto {
    fn from(response: UploadDocumentsResponse) -> Self {
        Self {
            status: response.status.as_str().to_string(),
            processed_documents: response
                .documents
                .into_iter()
                .map(ProcessedDocumentDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentSummaryDto {
    pub id: Uuid,
    pub filename: String,
    pub content_type: Option<String>,
    pub format: String,
    pub created_at: DateTime<Utc>,
    pub text_chunks: i64,
    pub table_chunks: i64,
}

impl From<Document> for DocumentSummaryDto {
    fn from(document: Document) -> Self {
        Self {
            id: document.id(),
            filename: document.filename().to_string(),
            content_type: document.content_type().map(|s| s.to_string()),
            format: document.format().as_str().to_string(),
            created_at: document.created_at(),
            text_chunks: document.text_chunk_count() as i64,
            table_chunks: document.table_chunk_count() as i64,
        }
    }
}

impl From<DocumentDetails> for DocumentSummaryDto {
    fn from(details: DocumentDetails) -> Self {
        Self {
            text_chunks: details.counts.text_chunks,
            table_chunks: details.counts.table_chunks,
            ..DocumentSummaryDto::from(details.document)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponseDto {
    pub documents: Vec<DocumentSummaryDto>,
}

#[derive(Debug, Serialize)]
pub struct DeleteDocumentResponseDto {
    pub status: String,
    pub message: String,
}
