use crate::domain::entities::Question;
use crate::domain::repositories::ChunkHit;
use crate::domain::value_objects::RetrievalPath;

/// Picks which retrieved context answers a question.
///
/// Rules, first match wins:
/// 1. nothing retrieved: no route;
/// 2. only text hits: text retrieval;
/// 3. only table hits: table analysis;
/// 4. the question asks for figures (see [`Question::has_tabular_intent`]):
///    table analysis;
/// 5. the best table hit scores at least as high as the best text hit:
///    combined;
/// 6. otherwise text retrieval.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetrievalRouter;

impl RetrievalRouter {
    pub fn new() -> Self {
        Self
    }

    pub fn route(
        &self,
        question: &Question,
        text_hits: &[ChunkHit],
        table_hits: &[ChunkHit],
    ) -> Option<RetrievalPath> {
        match (best_score(text_hits), best_score(table_hits)) {
            (None, None) => None,
            (Some(_), None) => Some(RetrievalPath::TextRetrieval),
            (None, Some(_)) => Some(RetrievalPath::TableAnalysis),
            (Some(_), Some(_)) if question.has_tabular_intent() => {
                Some(RetrievalPath::TableAnalysis)
            }
            (Some(text), Some(table)) if table >= text => Some(RetrievalPath::Combined),
            (Some(_), Some(_)) => Some(RetrievalPath::TextRetrieval),
        }
    }
}

fn best_score(hits: &[ChunkHit]) -> Option<f32> {
    hits.iter().map(|hit| hit.similarity).reduce(f32::max)
}
