use async_trait::async_trait;
use diesel::prelude::*;
use pgvector::{Vector, VectorExpressionMethods};
use uuid::Uuid;

use crate::domain::entities::{Document, TableChunk, TextChunk};
use crate::domain::repositories::{
    ChunkContent, ChunkCounts, ChunkHit, KnowledgeBase, KnowledgeBaseError,
    knowledge_base::validate_write,
};
use crate::domain::value_objects::ChunkKind;
use crate::infrastructure::database::models::{
    DocumentModel, NewDocumentModel, TableChunkModel, TextChunkModel,
};
use crate::infrastructure::database::schema::{documents, table_chunks, text_chunks};
use crate::infrastructure::database::{DbConnection, DbPool, get_connection_from_pool};

/// Knowledge base on PostgreSQL with pgvector. Diesel is synchronous, so
/// every call runs on the blocking pool.
pub struct PostgresKnowledgeBase {
    pool: DbPool,
}

impl PostgresKnowledgeBase {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn with_connection<T, F>(&self, f: F) -> Result<T, KnowledgeBaseError>
    where
        T: Send + 'static,
        F: FnOnce(&mut DbConnection) -> Result<T, KnowledgeBaseError> + Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = get_connection_from_pool(&pool)
                .map_err(|e| KnowledgeBaseError::DatabaseError(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| KnowledgeBaseError::DatabaseError(e.to_string()))?
    }
}

fn database_error(error: diesel::result::Error) -> KnowledgeBaseError {
    KnowledgeBaseError::DatabaseError(error.to_string())
}

/// Cosine distance ranges over [0, 2]; similarity is its complement.
fn similarity(distance: f64) -> f32 {
    (1.0 - distance) as f32
}

#[async_trait]
impl KnowledgeBase for PostgresKnowledgeBase {
    async fn write(
        &self,
        document: &Document,
        text_chunks: &[TextChunk],
        table_chunks: &[TableChunk],
    ) -> Result<(), KnowledgeBaseError> {
        validate_write(document, text_chunks, table_chunks)?;

        let document_id = document.id();
        let new_document = NewDocumentModel::from(document);
        let text_models: Vec<TextChunkModel> = text_chunks.iter().map(TextChunkModel::from).collect();
        let table_models = table_chunks
            .iter()
            .map(TableChunkModel::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(KnowledgeBaseError::ValidationError)?;

        self.with_connection(move |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::insert_into(documents::table)
                    .values(&new_document)
                    .execute(conn)?;

                if !text_models.is_empty() {
                    diesel::insert_into(text_chunks::table)
                        .values(&text_models)
                        .execute(conn)?;
                }

                if !table_models.is_empty() {
                    diesel::insert_into(table_chunks::table)
                        .values(&table_models)
                        .execute(conn)?;
                }

                Ok(())
            })
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => KnowledgeBaseError::DuplicateDocument(document_id),
                other => database_error(other),
            })
        })
        .await
    }

    async fn query(
        &self,
        embedding: &Vector,
        k: usize,
        kind: ChunkKind,
    ) -> Result<Vec<ChunkHit>, KnowledgeBaseError> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let embedding = embedding.clone();
        let limit = k as i64;

        self.with_connection(move |conn| match kind {
            ChunkKind::Text => {
                let rows = text_chunks::table
                    .inner_join(documents::table)
                    .select((
                        TextChunkModel::as_select(),
                        documents::filename,
                        text_chunks::embedding.cosine_distance(embedding.clone()),
                    ))
                    .order(text_chunks::embedding.cosine_distance(embedding))
                    .limit(limit)
                    .load::<(TextChunkModel, String, f64)>(conn)
                    .map_err(database_error)?;

                Ok(rows
                    .into_iter()
                    .map(|(model, filename, distance)| ChunkHit {
                        document_id: model.document_id,
                        content: ChunkContent::Text(TextChunk::from(model)),
                        filename,
                        similarity: similarity(distance),
                    })
                    .collect())
            }
            ChunkKind::Table => {
                let rows = table_chunks::table
                    .inner_join(documents::table)
                    .select((
                        TableChunkModel::as_select(),
                        documents::filename,
                        table_chunks::embedding.cosine_distance(embedding.clone()),
                    ))
                    .order(table_chunks::embedding.cosine_distance(embedding))
                    .limit(limit)
                    .load::<(TableChunkModel, String, f64)>(conn)
                    .map_err(database_error)?;

                rows.into_iter()
                    .map(|(model, filename, distance)| {
                        let document_id = model.document_id;
                        let table = TableChunk::try_from(model)
                            .map_err(KnowledgeBaseError::ValidationError)?;
                        Ok(ChunkHit {
                            content: ChunkContent::Table(table),
                            document_id,
                            filename,
                            similarity: similarity(distance),
                        })
                    })
                    .collect()
            }
        })
        .await
    }

    async fn list(&self) -> Result<Vec<Document>, KnowledgeBaseError> {
        self.with_connection(|conn| {
            documents::table
                .order((documents::created_at.asc(), documents::id.asc()))
                .select(DocumentModel::as_select())
                .load::<DocumentModel>(conn)
                .map_err(database_error)?
                .into_iter()
                .map(|model| Document::try_from(model).map_err(KnowledgeBaseError::ValidationError))
                .collect()
        })
        .await
    }

    async fn get(&self, document_id: Uuid) -> Result<Option<Document>, KnowledgeBaseError> {
        self.with_connection(move |conn| {
            documents::table
                .find(document_id)
                .select(DocumentModel::as_select())
                .first::<DocumentModel>(conn)
                .optional()
                .map_err(database_error)?
                .map(|model| Document::try_from(model).map_err(KnowledgeBaseError::ValidationError))
                .transpose()
        })
        .await
    }

    async fn delete(&self, document_id: Uuid) -> Result<bool, KnowledgeBaseError> {
        self.with_connection(move |conn| {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::delete(text_chunks::table.filter(text_chunks::document_id.eq(document_id)))
                    .execute(conn)?;
                diesel::delete(table_chunks::table.filter(table_chunks::document_id.eq(document_id)))
                    .execute(conn)?;
                let deleted = diesel::delete(documents::table.find(document_id)).execute(conn)?;

                Ok(deleted > 0)
            })
            .map_err(database_error)
        })
        .await
    }

    async fn count_chunks(&self, document_id: Uuid) -> Result<ChunkCounts, KnowledgeBaseError> {
        self.with_connection(move |conn| {
            let text = text_chunks::table
                .filter(text_chunks::document_id.eq(document_id))
                .count()
                .get_result::<i64>(conn)
                .map_err(database_error)?;

            let table = table_chunks::table
                .filter(table_chunks::document_id.eq(document_id))
                .count()
                .get_result::<i64>(conn)
                .map_err(database_error)?;

            Ok(ChunkCounts {
                text_chunks: text,
                table_chunks: table,
            })
        })
        .await
    }
}
