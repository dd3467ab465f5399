use diesel::prelude::*;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::TableChunk;
use crate::infrastructure::database::schema::table_chunks;

/// Rows are stored as a JSON array of arrays of strings.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = table_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TableChunkModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub table_index: i32,
    pub rows: serde_json::Value,
    pub summary: String,
    pub embedding: Vector,
}

impl TryFrom<&TableChunk> for TableChunkModel {
    type Error = String;

    fn try_from(chunk: &TableChunk) -> Result<Self, Self::Error> {
        Ok(Self {
            id: chunk.id(),
            document_id: chunk.document_id(),
            table_index: chunk.table_index(),
            rows: serde_json::to_value(chunk.rows()).map_err(|e| e.to_string())?,
            summary: chunk.summary().to_string(),
            embedding: chunk.embedding().clone(),
        })
    }
}

impl TryFrom<TableChunkModel> for TableChunk {
    type Error = String;

    fn try_from(model: TableChunkModel) -> Result<Self, Self::Error> {
        let rows: Vec<Vec<String>> = serde_json::from_value(model.rows)
            .map_err(|e| format!("Invalid rows for table chunk {}: {}", model.id, e))?;

        Ok(TableChunk::restore(
            model.id,
            model.document_id,
            model.table_index,
            rows,
            model.summary,
            model.embedding,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_survive_json_column() {
        let chunk = TableChunk::new(
            Uuid::new_v4(),
            2,
            vec![
                vec!["name".to_string(), "qty".to_string()],
                vec!["bolt".to_string(), "4".to_string()],
            ],
            Vector::from(vec![0.1, 0.2]),
        );

        let model = TableChunkModel::try_from(&chunk).unwrap();
        assert_eq!(model.rows, serde_json::json!([["name", "qty"], ["bolt", "4"]]));

        let restored = TableChunk::try_from(model).unwrap();
        assert_eq!(restored, chunk);
    }

    #[test]
    fn test_malformed_rows_are_rejected() {
        let model = TableChunkModel {
            id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            table_index: 0,
            rows: serde_json::json!({ "not": "rows" }),
            summary: String::new(),
            embedding: Vector::from(vec![1.0]),
        };

        assert!(TableChunk::try_from(model).is_err());
    }
}
