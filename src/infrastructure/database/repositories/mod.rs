pub mod postgres_knowledge_base;

pub use postgres_knowledge_base::PostgresKnowledgeBase;
