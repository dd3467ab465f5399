use pgvector::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    id: Uuid,
    document_id: Uuid,
    chunk_index: i32,
    text: String,
    embedding: Vector,
}

impl TextChunk {
    pub fn new(document_id: Uuid, chunk_index: i32, text: String, embedding: Vector) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            chunk_index,
            text,
            embedding,
        }
    }

    pub fn restore(
        id: Uuid,
        document_id: Uuid,
        chunk_index: i32,
        text: String,
        embedding: Vector,
    ) -> Self {
        Self {
            id,
            document_id,
            chunk_index,
            text,
            embedding,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn chunk_index(&self) -> i32 {
        self.chunk_index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn embedding(&self) -> &Vector {
        &self.embedding
    }

    pub fn belongs_to(&self, document_id: Uuid) -> bool {
        self.document_id == document_id
    }
}
