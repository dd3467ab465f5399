use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::services::document_processor::DocumentProcessingError;
use crate::application::use_cases::{
    AskQuestionError, DeleteDocumentError, GetDocumentError, ListDocumentsError,
    UploadDocumentsError,
};
use crate::presentation::http::dto::ApiResponse;

/// An error rendered as the standard `ApiResponse` envelope.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<String>,
}

impl HttpError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", message)
    }

    fn storage(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_FAILED", message)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{} {}: {}", self.status, self.code, self.message);
        }

        (
            self.status,
            Json(ApiResponse::<()>::error(
                self.code.to_string(),
                self.message,
                self.details,
            )),
        )
            .into_response()
    }
}

pub fn processing_error_code(error: &DocumentProcessingError) -> &'static str {
    match error {
        DocumentProcessingError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
        DocumentProcessingError::ExtractionError(_) => "EXTRACTION_FAILED",
        DocumentProcessingError::EmbeddingError(_) => "EMBEDDING_FAILED",
        DocumentProcessingError::StorageError(_) => "STORAGE_FAILED",
    }
}

impl From<UploadDocumentsError> for HttpError {
    fn from(error: UploadDocumentsError) -> Self {
        match error {
            UploadDocumentsError::ValidationError(msg) => HttpError::invalid_request(msg),
        }
    }
}

impl From<AskQuestionError> for HttpError {
    fn from(error: AskQuestionError) -> Self {
        let message = error.to_string();
        match error {
            AskQuestionError::InvalidQuestion(_) => HttpError::invalid_request(message),
            AskQuestionError::RetrievalError(_) => {
                HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, "RETRIEVAL_FAILED", message)
            }
            AskQuestionError::NoRelevantData => {
                HttpError::new(StatusCode::NOT_FOUND, "NO_RELEVANT_DATA", message)
            }
            AskQuestionError::SynthesisError(_) => {
                HttpError::new(StatusCode::BAD_GATEWAY, "SYNTHESIS_FAILED", message)
            }
        }
    }
}

impl From<ListDocumentsError> for HttpError {
    fn from(error: ListDocumentsError) -> Self {
        HttpError::storage(error.to_string())
    }
}

impl From<GetDocumentError> for HttpError {
    fn from(error: GetDocumentError) -> Self {
        match error {
            GetDocumentError::NotFound(_) => HttpError::not_found(error.to_string()),
            GetDocumentError::RepositoryError(_) => HttpError::storage(error.to_string()),
        }
    }
}

impl From<DeleteDocumentError> for HttpError {
    fn from(error: DeleteDocumentError) -> Self {
        match error {
            DeleteDocumentError::NotFound(_) => HttpError::not_found(error.to_string()),
            DeleteDocumentError::RepositoryError(_) => HttpError::storage(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_error_codes() {
        let cases = [
            (DocumentProcessingError::UnsupportedFormat("x".into()), "UNSUPPORTED_FORMAT"),
            (DocumentProcessingError::ExtractionError("x".into()), "EXTRACTION_FAILED"),
            (DocumentProcessingError::EmbeddingError("x".into()), "EMBEDDING_FAILED"),
            (DocumentProcessingError::StorageError("x".into()), "STORAGE_FAILED"),
        ];

        for (error, code) in cases {
            assert_eq!(processing_error_code(&error), code);
        }
    }

    #[test]
    fn test_question_error_mapping() {
        let no_data = HttpError::from(AskQuestionError::NoRelevantData);
        let synthesis = HttpError::from(AskQuestionError::SynthesisError("down".into()));

        assert_eq!(no_data.status, StatusCode::NOT_FOUND);
        assert_eq!(no_data.code, "NO_RELEVANT_DATA");
        assert_eq!(synthesis.status, StatusCode::BAD_GATEWAY);
        assert_eq!(synthesis.code, "SYNTHESIS_FAILED");
    }
}
