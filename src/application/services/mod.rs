pub mod document_processor;
pub mod qa_orchestrator;
pub mod retrieval_router;
pub mod text_chunker;

pub use document_processor::{DocumentProcessorService, DocumentUpload, ProcessedDocument};
pub use qa_orchestrator::{QaError, QaOrchestrator, QaSettings};
pub use retrieval_router::RetrievalRouter;
pub use text_chunker::{ChunkingStrategy, TextChunker};
