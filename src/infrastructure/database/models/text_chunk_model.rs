use diesel::prelude::*;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::TextChunk;
use crate::infrastructure::database::schema::text_chunks;

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = text_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TextChunkModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub chunk_index: i32,
    pub content: String,
    pub embedding: Vector,
}

impl From<&TextChunk> for TextChunkModel {
    fn from(chunk: &TextChunk) -> Self {
        Self {
            id: chunk.id(),
            document_id: chunk.document_id(),
            chunk_index: chunk.chunk_index(),
            content: chunk.text().to_string(),
            embedding: chunk.embedding().clone(),
        }
    }
}

impl From<TextChunkModel> for TextChunk {
    fn from(model: TextChunkModel) -> Self {
        TextChunk::restore(
            model.id,
            model.document_id,
            model.chunk_index,
            model.content,
            model.embedding,
        )
    }
}
