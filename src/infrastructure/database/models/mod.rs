pub mod document_model;
pub mod table_chunk_model;
pub mod text_chunk_model;

pub use document_model::{DocumentModel, NewDocumentModel};
pub use table_chunk_model::TableChunkModel;
pub use text_chunk_model::TextChunkModel;
