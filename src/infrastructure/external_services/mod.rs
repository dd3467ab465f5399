pub mod completion_client;
pub mod document_parsers;
pub mod inference_client;

pub use completion_client::{ChatCompletionClient, CompletionClientConfig};
pub use inference_client::{EmbeddingsClientConfig, InferenceClient, InferenceEmbeddingProvider};
