use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::{Document, TableChunk, TextChunk};
use crate::domain::repositories::{
    ChunkContent, ChunkCounts, ChunkHit, KnowledgeBase, KnowledgeBaseError,
    knowledge_base::validate_write,
};
use crate::domain::value_objects::ChunkKind;

#[derive(Default)]
struct Store {
    documents: Vec<Document>,
    text_chunks: Vec<TextChunk>,
    table_chunks: Vec<TableChunk>,
}

/// Knowledge base held in process memory, used when no database is
/// configured. A single lock guards documents and chunks together so each
/// write or delete is seen whole.
#[derive(Default)]
pub struct InMemoryKnowledgeBase {
    store: RwLock<Store>,
}

impl InMemoryKnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KnowledgeBase for InMemoryKnowledgeBase {
    async fn write(
        &self,
        document: &Document,
        text_chunks: &[TextChunk],
        table_chunks: &[TableChunk],
    ) -> Result<(), KnowledgeBaseError> {
        validate_write(document, text_chunks, table_chunks)?;

        let mut store = self.store.write();
        if store.documents.iter().any(|d| d.id() == document.id()) {
            return Err(KnowledgeBaseError::DuplicateDocument(document.id()));
        }

        store.documents.push(document.clone());
        store.text_chunks.extend_from_slice(text_chunks);
        store.table_chunks.extend_from_slice(table_chunks);

        Ok(())
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

        let store = self.store.read();
        let filenames: HashMap<Uuid, &str> = store
            .documents
            .iter()
            .map(|d| (d.id(), d.filename()))
            .collect();

        let scored: Vec<(ChunkContent, Uuid, f32)> = match kind {
            ChunkKind::Text => store
                .text_chunks
                .iter()
                .map(|c| {
                    let score = calculate_cosine_similarity(embedding, c.embedding());
                    (ChunkContent::Text(c.clone()), c.document_id(), score)
                })
                .collect(),
            ChunkKind::Table => store
                .table_chunks
                .iter()
                .map(|c| {
                    let score = calculate_cosine_similarity(embedding, c.embedding());
                    (ChunkContent::Table(c.clone()), c.document_id(), score)
                })
                .collect(),
        };

        let mut hits: Vec<ChunkHit> = scored
            .into_iter()
            .filter_map(|(content, document_id, similarity)| {
                let filename = filenames.get(&document_id)?;
                Some(ChunkHit {
                    content,
                    document_id,
                    filename: filename.to_string(),
                    similarity,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        hits.truncate(k);

        Ok(hits)
    }

    async fn list(&self) -> Result<Vec<Document>, KnowledgeBaseError> {
        let mut documents = self.store.read().documents.clone();
        documents.sort_by_key(|d| (d.created_at(), d.id()));
        Ok(documents)
    }

    async fn get(&self, document_id: Uuid) -> Result<Option<Document>, KnowledgeBaseError> {
        Ok(self
            .store
            .read()
            .documents
            .iter()
            .find(|d| d.id() == document_id)
            .cloned())
    }

    async fn delete(&self, document_id: Uuid) -> Result<bool, KnowledgeBaseError> {
        let mut store = self.store.write();
        let before = store.documents.len();

        store.documents.retain(|d| d.id() != document_id);
        if store.documents.len() == before {
            return Ok(false);
        }

        store.text_chunks.retain(|c| !c.belongs_to(document_id));
        store.table_chunks.retain(|c| !c.belongs_to(document_id));

        Ok(true)
    }

    async fn count_chunks(&self, document_id: Uuid) -> Result<ChunkCounts, KnowledgeBaseError> {
        let store = self.store.read();
        Ok(ChunkCounts {
            text_chunks: store
                .text_chunks
                .iter()
                .filter(|c| c.belongs_to(document_id))
                .count() as i64,
            table_chunks: store
                .table_chunks
                .iter()
                .filter(|c| c.belongs_to(document_id))
                .count() as i64,
        })
    }
}

fn calculate_cosine_similarity(a: &Vector, b: &Vector) -> f32 {
    let a_slice = a.as_slice();
    let b_slice = b.as_slice();

    if a_slice.len() != b_slice.len() {
        return 0.0;
    }

    let dot_product: f32 = a_slice.iter().zip(b_slice.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a_slice.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b_slice.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
