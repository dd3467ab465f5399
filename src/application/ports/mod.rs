pub mod completion_provider;
pub mod document_parser;
pub mod embedding_provider;

pub use completion_provider::CompletionProvider;
pub use document_parser::DocumentParser;
pub use embedding_provider::EmbeddingProvider;
