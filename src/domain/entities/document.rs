use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{ContentHash, DocumentFormat};

/// An ingested file. Its chunks live in the knowledge base under `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: Uuid,
    filename: String,
    content_type: Option<String>,
    format: DocumentFormat,
    content_hash: ContentHash,
    created_at: DateTime<Utc>,
    text_chunk_count: i32,
    table_chunk_count: i32,
}

impl Document {
    pub fn new(
        id: Uuid,
        filename: String,
        content_type: Option<String>,
        format: DocumentFormat,
        content_hash: ContentHash,
        text_chunk_count: i32,
        table_chunk_count: i32,
    ) -> Self {
        Self {
            id,
            filename,
            content_type,
            format,
            content_hash,
            created_at: Utc::now(),
            text_chunk_count,
            table_chunk_count,
        }
    }

    /// Rebuilds a document read back from storage, keeping its original
    /// identity and timestamp.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        filename: String,
        content_type: Option<String>,
        format: DocumentFormat,
        content_hash: ContentHash,
        created_at: DateTime<Utc>,
        text_chunk_count: i32,
        table_chunk_count: i32,
    ) -> Self {
        Self {
            id,
            filename,
            content_type,
            format,
            content_hash,
            created_at,
            text_chunk_count,
            table_chunk_count,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn text_chunk_count(&self) -> i32 {
        self.text_chunk_count
    }

    pub fn table_chunk_count(&self) -> i32 {
        self.table_chunk_count
    }
}
