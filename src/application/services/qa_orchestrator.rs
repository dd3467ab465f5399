use std::sync::Arc;

use crate::application::ports::{
    CompletionProvider, EmbeddingProvider, completion_provider::Message,
};
use crate::application::services::retrieval_router::RetrievalRouter;
use crate::domain::entities::{Answer, Question};
use crate::domain::repositories::{ChunkContent, ChunkHit, KnowledgeBase};
use crate::domain::value_objects::{ChunkKind, RetrievalPath};

const TEXT_INSTRUCTIONS: &str = "You answer questions using only the document excerpts supplied \
by the user. Do not rely on outside knowledge. Keep the answer short and to the point, and stay \
close to the wording of the excerpts. If the excerpts do not contain the answer, say that the \
documents do not cover it.";

const TABLE_INSTRUCTIONS: &str = "You answer questions by reading the tables supplied by the \
user. Every figure you mention must come from those tables. Show the values you relied on. If \
the tables do not contain the answer, say that the documents do not cover it.";

#[derive(Debug, thiserror::Error)]
pub enum QaError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),
    #[error("Retrieval error: {0}")]
    RetrievalError(String),
    #[error("No relevant data found for the question")]
    NoRelevantData,
    #[error("Synthesis error: {0}")]
    SynthesisError(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QaSettings {
    pub text_top_k: usize,
    pub table_top_k: usize,
    pub context_text_chunks: usize,
    pub context_tables: usize,
    /// Hits scoring below this cosine similarity are ignored.
    pub min_similarity: f32,
}

impl Default for QaSettings {
    fn default() -> Self {
        Self {
            text_top_k: 5,
            table_top_k: 3,
            context_text_chunks: 3,
            context_tables: 2,
            min_similarity: 0.1,
        }
    }
}

pub struct QaOrchestrator {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    knowledge_base: Arc<dyn KnowledgeBase>,
    completion_provider: Arc<dyn CompletionProvider>,
    router: RetrievalRouter,
    settings: QaSettings,
}

impl QaOrchestrator {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        knowledge_base: Arc<dyn KnowledgeBase>,
        completion_provider: Arc<dyn CompletionProvider>,
        settings: QaSettings,
    ) -> Self {
        Self {
            embedding_provider,
            knowledge_base,
            completion_provider,
            router: RetrievalRouter::new(),
            settings,
        }
    }

    pub async fn answer(&self, question: &Question) -> Result<Answer, QaError> {
        if question.is_empty() {
            return Err(QaError::InvalidQuestion("Question cannot be empty".to_string()));
        }

        let embedding = self
            .embedding_provider
            .embed(question.text())
            .await
            .map_err(|e| QaError::RetrievalError(e.to_string()))?;

        let (text_hits, table_hits) = futures::try_join!(
            self.knowledge_base
                .query(&embedding, self.settings.text_top_k, ChunkKind::Text),
            self.knowledge_base
                .query(&embedding, self.settings.table_top_k, ChunkKind::Table),
        )
        .map_err(|e| QaError::RetrievalError(e.to_string()))?;

        let text_hits = self.relevant(text_hits);
        let table_hits = self.relevant(table_hits);

        let path = self
            .router
            .route(question, &text_hits, &table_hits)
            .ok_or(QaError::NoRelevantData)?;

        let text_context: &[ChunkHit] = if path.uses_text() {
            &text_hits[..text_hits.len().min(self.settings.context_text_chunks)]
        } else {
            &[]
        };
        let table_context: &[ChunkHit] = if path.uses_tables() {
            &table_hits[..table_hits.len().min(self.settings.context_tables)]
        } else {
            &[]
        };

        tracing::info!(
            "Answering with {} ({} text chunks, {} tables)",
            path,
            text_context.len(),
            table_context.len()
        );

        let messages = build_messages(question, path, text_context, table_context);
        let completion = self
            .completion_provider
            .complete(&messages)
            .await
            .map_err(|e| QaError::SynthesisError(e.to_string()))?;

        if let Some(usage) = completion.usage {
            tracing::debug!(
                "Completion used {} prompt + {} completion = {} tokens",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        let text = completion.content.trim().to_string();
        if text.is_empty() {
            return Err(QaError::SynthesisError(
                "The model returned an empty answer".to_string(),
            ));
        }

        let mut documents: Vec<String> = Vec::new();
        for hit in text_context.iter().chain(table_context) {
            if !documents.contains(&hit.filename) {
                documents.push(hit.filename.clone());
            }
        }

        Ok(Answer::new(
            text,
            text_context.len(),
            table_context.len(),
            path,
            documents,
        ))
    }

    fn relevant(&self, hits: Vec<ChunkHit>) -> Vec<ChunkHit> {
        hits.into_iter()
            .filter(|hit| hit.similarity >= self.settings.min_similarity)
            .collect()
    }
}

fn build_messages(
    question: &Question,
    path: RetrievalPath,
    text_context: &[ChunkHit],
    table_context: &[ChunkHit],
) -> Vec<Message> {
    let instructions = match path {
        RetrievalPath::TextRetrieval => TEXT_INSTRUCTIONS.to_string(),
        RetrievalPath::TableAnalysis => TABLE_INSTRUCTIONS.to_string(),
        RetrievalPath::Combined => format!("{}\n\n{}", TEXT_INSTRUCTIONS, TABLE_INSTRUCTIONS),
    };

    let mut prompt = format!("Question: {}\n", question.text());

    if path.uses_text() {
        prompt.push_str("\nRelevant text:\n");
        prompt.push_str(&format_text_context(text_context));
    }
    if path.uses_tables() {
        prompt.push_str("\nRelevant tables:\n");
        prompt.push_str(&format_table_context(table_context));
    }

    vec![Message::system(instructions), Message::user(prompt)]
}

fn format_text_context(hits: &[ChunkHit]) -> String {
    if hits.is_empty() {
        return "No relevant text found.\n".to_string();
    }

    let mut formatted = String::new();
    for (i, hit) in hits.iter().enumerate() {
        if let ChunkContent::Text(chunk) = &hit.content {
            formatted.push_str(&format!(
                "Text {} (from {}):\n{}\n\n",
                i + 1,
                hit.filename,
                chunk.text()
            ));
        }
    }
    formatted
}

fn format_table_context(hits: &[ChunkHit]) -> String {
    if hits.is_empty() {
        return "No relevant tables found.\n".to_string();
    }

    let mut formatted = String::new();
    for (i, hit) in hits.iter().enumerate() {
        if let ChunkContent::Table(table) = &hit.content {
            formatted.push_str(&format!(
                "Table {} (from {}):\nDescription: {}\nData:\n{}\n\n",
                i + 1,
                hit.filename,
                table.summary(),
                table.render()
            ));
        }
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::document_processor::{
        DocumentProcessorService, DocumentUpload,
    };
    use crate::application::services::text_chunker::{ChunkingStrategy, TextChunker};
    use crate::infrastructure::external_services::document_parsers::CompositeDocumentParser;
    use crate::infrastructure::memory::InMemoryKnowledgeBase;
    use crate::testing::{EchoCompletionProvider, FailingCompletionProvider, HashingEmbeddingProvider};
    use uuid::Uuid;

    struct Fixture {
        processor: DocumentProcessorService,
        orchestrator: QaOrchestrator,
    }

    fn fixture_with(completion: Arc<dyn CompletionProvider>) -> Fixture {
        let kb: Arc<dyn KnowledgeBase> = Arc::new(InMemoryKnowledgeBase::new());
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbeddingProvider::default());

        Fixture {
            processor: DocumentProcessorService::new(
                Arc::new(CompositeDocumentParser::new()),
                embedder.clone(),
                kb.clone(),
                TextChunker::new(ChunkingStrategy::FixedSize, 500),
            ),
            orchestrator: QaOrchestrator::new(embedder, kb, completion, QaSettings::default()),
        }
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(EchoCompletionProvider))
    }

    async fn ingest(fixture: &Fixture, filename: &str, data: &[u8]) {
        fixture
            .processor
            .process(&DocumentUpload {
                document_id: Uuid::new_v4(),
                filename: filename.to_string(),
                content_type: None,
                data: data.to_vec(),
            })
            .await
            .unwrap();
    }

    fn ask(text: &str) -> Question {
        Question::new(text.to_string())
    }

    #[tokio::test]
    async fn test_answers_from_text() {
        let fixture = fixture();
        ingest(&fixture, "sky.txt", b"The sky is blue.").await;

        let answer = fixture.orchestrator.answer(&ask("What color is the sky?")).await.unwrap();

        assert!(answer.text().contains("blue"));
        assert_eq!(answer.text_chunks(), 1);
        assert_eq!(answer.table_chunks(), 0);
        assert_eq!(answer.path(), RetrievalPath::TextRetrieval);
        assert_eq!(answer.documents(), ["sky.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_knowledge_base_has_no_relevant_data() {
        let fixture = fixture();
        let result = fixture.orchestrator.answer(&ask("What color is the sky?")).await;
        assert!(matches!(result, Err(QaError::NoRelevantData)));
    }

    #[tokio::test]
    async fn test_unrelated_question_has_no_relevant_data() {
        let fixture = fixture();
        ingest(&fixture, "sky.txt", b"The sky is blue.").await;

        let result = fixture.orchestrator.answer(&ask("Quarterly zinc exports?")).await;

        assert!(matches!(result, Err(QaError::NoRelevantData)));
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected() {
        let fixture = fixture();
        let result = fixture.orchestrator.answer(&ask("  ")).await;
        assert!(matches!(result, Err(QaError::InvalidQuestion(_))));
    }

    #[tokio::test]
    async fn test_tabular_question_uses_tables() {
        let fixture = fixture();
        ingest(
            &fixture,
            "sales.csv",
            b"region,revenue\nnorth,120\nsouth,80\n",
        )
        .await;
        ingest(&fixture, "notes.txt", b"The north region revenue grew steadily.").await;

        let answer = fixture
            .orchestrator
            .answer(&ask("How many units of revenue did north region have?"))
            .await
            .unwrap();

        assert_eq!(answer.path(), RetrievalPath::TableAnalysis);
        assert_eq!(answer.text_chunks(), 0);
        assert_eq!(answer.table_chunks(), 1);
        assert!(answer.text().contains("north | 120"));
    }

    #[tokio::test]
    async fn test_llm_failure_is_a_synthesis_error() {
        let fixture = fixture_with(Arc::new(FailingCompletionProvider));
        ingest(&fixture, "sky.txt", b"The sky is blue.").await;

        let result = fixture.orchestrator.answer(&ask("What color is the sky?")).await;

        assert!(matches!(result, Err(QaError::SynthesisError(_))));
    }
}
