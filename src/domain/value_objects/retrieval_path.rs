use serde::{Deserialize, Serialize};

/// Which retrieved context was handed to the LLM. Reported to clients as
/// `agent_used`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalPath {
    TextRetrieval,
    TableAnalysis,
    Combined,
}

impl RetrievalPath {
    pub fn label(&self) -> &'static str {
        match self {
            RetrievalPath::TextRetrieval => "text_retrieval",
            RetrievalPath::TableAnalysis => "table_analysis",
            RetrievalPath::Combined => "combined",
        }
    }

    pub fn uses_text(&self) -> bool {
        matches!(self, RetrievalPath::TextRetrieval | RetrievalPath::Combined)
    }

    pub fn uses_tables(&self) -> bool {
        matches!(self, RetrievalPath::TableAnalysis | RetrievalPath::Combined)
    }
}

impl std::fmt::Display for RetrievalPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
