pub mod ask_question;
pub mod delete_document;
pub mod get_document;
pub mod list_documents;
pub mod upload_documents;

pub use ask_question::{AskQuestionError, AskQuestionRequest, AskQuestionResponse, AskQuestionUseCase};
pub use delete_document::{DeleteDocumentError, DeleteDocumentUseCase};
pub use get_document::{DocumentDetails, GetDocumentError, GetDocumentUseCase};
pub use list_documents::{ListDocumentsError, ListDocumentsUseCase};
pub use upload_documents::{
    BatchStatus, DocumentOutcome, UploadDocumentsError, UploadDocumentsRequest,
    UploadDocumentsResponse, UploadDocumentsUseCase, UploadedFile,
};
