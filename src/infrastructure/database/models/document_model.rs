use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::Document;
use crate::domain::value_objects::{ContentHash, DocumentFormat};
use crate::infrastructure::database::schema::documents;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentModel {
    pub id: Uuid,
    pub filename: String,
    pub content_type: Option<String>,
    pub format: String,
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub text_chunk_count: i32,
    pub table_chunk_count: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentModel {
    pub id: Uuid,
    pub filename: String,
    pub content_type: Option<String>,
    pub format: String,
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
    pub text_chunk_count: i32,
    pub table_chunk_count: i32,
}

impl From<&Document> for NewDocumentModel {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id(),
            filename: document.filename().to_string(),
            content_type: document.content_type().map(|s| s.to_string()),
            format: document.format().as_str().to_string(),
            content_hash: document.content_hash().as_str().to_string(),
            created_at: document.created_at(),
            text_chunk_count: document.text_chunk_count(),
            table_chunk_count: document.table_chunk_count(),
        }
    }
}

impl TryFrom<DocumentModel> for Document {
    type Error = String;

    fn try_from(model: DocumentModel) -> Result<Self, Self::Error> {
        Ok(Document::restore(
            model.id,
            model.filename,
            model.content_type,
            model.format.parse::<DocumentFormat>()?,
            ContentHash::parse(&model.content_hash)?,
            model.created_at,
            model.text_chunk_count,
            model.table_chunk_count,
        ))
    }
}
