use serde::{Deserialize, Serialize};

use crate::domain::value_objects::RetrievalPath;

/// A synthesized answer together with what it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    text: String,
    text_chunks: usize,
    table_chunks: usize,
    path: RetrievalPath,
    documents: Vec<String>,
}

impl Answer {
    pub fn new(
        text: String,
        text_chunks: usize,
        table_chunks: usize,
        path: RetrievalPath,
        documents: Vec<String>,
    ) -> Self {
        Self {
            text,
            text_chunks,
            table_chunks,
            path,
            documents,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_chunks(&self) -> usize {
        self.text_chunks
    }

    pub fn table_chunks(&self) -> usize {
        self.table_chunks
    }

    pub fn path(&self) -> RetrievalPath {
        self.path
    }

    /// Filenames of the documents whose chunks were in the context.
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn sources(&self) -> Vec<String> {
        vec![
            format!("Text chunks: {}", self.text_chunks),
            format!("Tables: {}", self.table_chunks),
        ]
    }
}
