use pgvector::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Data rows included in a table summary, after the header row.
const SUMMARY_DATA_ROWS: usize = 3;

/// A table extracted from a document, kept as rows instead of being
/// flattened into prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableChunk {
    id: Uuid,
    document_id: Uuid,
    table_index: i32,
    rows: Vec<Vec<String>>,
    summary: String,
    embedding: Vector,
}

impl TableChunk {
    pub fn new(document_id: Uuid, table_index: i32, rows: Vec<Vec<String>>, embedding: Vector) -> Self {
        let summary = Self::summarize(&rows);
        Self {
            id: Uuid::new_v4(),
            document_id,
            table_index,
            rows,
            summary,
            embedding,
        }
    }

    pub fn restore(
        id: Uuid,
        document_id: Uuid,
        table_index: i32,
        rows: Vec<Vec<String>>,
        summary: String,
        embedding: Vector,
    ) -> Self {
        Self {
            id,
            document_id,
            table_index,
            rows,
            summary,
            embedding,
        }
    }

    /// Searchable rendering of a table: the header line followed by the
    /// first few data rows, cells separated by ` | `.
    pub fn summarize(rows: &[Vec<String>]) -> String {
        let Some((header, data)) = rows.split_first() else {
            return String::new();
        };

        let mut lines = Vec::with_capacity(1 + SUMMARY_DATA_ROWS);
        lines.push(format!("Table headers: {}", header.join(" | ")));
        lines.extend(data.iter().take(SUMMARY_DATA_ROWS).map(|row| row.join(" | ")));
        lines.join("\n")
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn table_index(&self) -> i32 {
        self.table_index
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn embedding(&self) -> &Vector {
        &self.embedding
    }

    pub fn belongs_to(&self, document_id: Uuid) -> bool {
        self.document_id == document_id
    }

    /// Full table as pipe separated lines, header first.
    pub fn render(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join(" | "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
