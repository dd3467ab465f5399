pub mod chunk_kind;
pub mod content_hash;
pub mod document_format;
pub mod retrieval_path;

pub use chunk_kind::ChunkKind;
pub use content_hash::ContentHash;
pub use document_format::DocumentFormat;
pub use retrieval_path::RetrievalPath;
