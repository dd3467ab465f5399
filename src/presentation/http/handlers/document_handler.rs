use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::{
    DeleteDocumentUseCase, GetDocumentUseCase, ListDocumentsUseCase, UploadDocumentsRequest,
    UploadDocumentsUseCase, UploadedFile,
};
use crate::presentation::http::dto::{
    DeleteDocumentResponseDto, DocumentListResponseDto, DocumentSummaryDto,
    UploadDocumentsResponseDto,
};
use crate::presentation::http::errors::HttpError;

pub struct DocumentHandler {
    upload_use_case: Arc<UploadDocumentsUseCase>,
    list_use_case: Arc<ListDocumentsUseCase>,
    get_use_case: Arc<GetDocumentUseCase>,
    delete_use_case: Arc<DeleteDocumentUseCase>,
}

impl DocumentHandler {
    pub fn new(
        upload_use_case: Arc<UploadDocumentsUseCase>,
        list_use_case: Arc<ListDocumentsUseCase>,
        get_use_case: Arc<GetDocumentUseCase>,
        delete_use_case: Arc<DeleteDocumentUseCase>,
    ) -> Self {
        Self {
            upload_use_case,
            list_use_case,
            get_use_case,
            delete_use_case,
        }
    }

    /// Every multipart field that carries a filename is treated as a file,
    /// whatever the field is called.
    pub async fn upload_documents(
        State(handler): State<Arc<DocumentHandler>>,
        mut multipart: Multipart,
    ) -> Result<impl IntoResponse, HttpError> {
        let mut files = Vec::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error("Malformed multipart body", e))?
        {
            let Some(filename) = field.file_name().map(|name| name.to_string()) else {
                continue;
            };
            let content_type = field.content_type().map(|ct| ct.to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error(&format!("Failed to read {}", filename), e))?;

            files.push(UploadedFile {
                filename,
                content_type,
                data: data.to_vec(),
            });
        }

        if files.is_empty() {
            return Err(HttpError::invalid_request("No file provided in the request"));
        }

        let response = handler
            .upload_use_case
            .execute(UploadDocumentsRequest { files })
            .await?;

        let status = if response.processed_count() > 0 {
            StatusCode::OK
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        };

        Ok((status, Json(UploadDocumentsResponseDto::from(response))))
    }

    pub async fn list_documents(
        State(handler): State<Arc<DocumentHandler>>,
    ) -> Result<impl IntoResponse, HttpError> {
        let documents = handler.list_use_case.execute().await?;

        let dto = DocumentListResponseDto {
            documents: documents.into_iter().map(DocumentSummaryDto::from).collect(),
        };

        Ok((StatusCode::OK, Json(dto)))
    }

    pub async fn get_document(
        State(handler): State<Arc<DocumentHandler>>,
        Path(document_id): Path<String>,
    ) -> Result<impl IntoResponse, HttpError> {
        let document_id = parse_document_id(&document_id)?;
        let details = handler.get_use_case.execute(document_id).await?;

        Ok((StatusCode::OK, Json(DocumentSummaryDto::from(details))))
    }

    pub async fn delete_document(
        State(handler): State<Arc<DocumentHandler>>,
        Path(document_id): Path<String>,
    ) -> Result<impl IntoResponse, HttpError> {
        let document_id = parse_document_id(&document_id)?;
        handler.delete_use_case.execute(document_id).await?;

        let dto = DeleteDocumentResponseDto {
            status: "success".to_string(),
            message: format!("Document {} deleted", document_id),
        };

        Ok((StatusCode::OK, Json(dto)))
    }
}

fn multipart_error(message: &str, error: MultipartError) -> HttpError {
    let details = error.body_text();
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        HttpError::payload_too_large("Upload exceeds the configured size limit").with_details(details)
    } else {
        HttpError::invalid_request(message).with_details(details)
    }
}

fn parse_document_id(raw: &str) -> Result<Uuid, HttpError> {
    Uuid::parse_str(raw)
        .map_err(|e| HttpError::invalid_request(format!("Invalid document id: {}", raw)).with_details(e.to_string()))
}
