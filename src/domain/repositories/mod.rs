pub mod knowledge_base;

pub use knowledge_base::{ChunkContent, ChunkCounts, ChunkHit, KnowledgeBase, KnowledgeBaseError};
