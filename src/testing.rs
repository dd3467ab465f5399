//! Test doubles and fixtures shared by unit tests across the crate.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::io::{Cursor, Write};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use pgvector::Vector;
use zip::write::SimpleFileOptions;

use crate::application::ports::completion_provider::{
    Completion, CompletionProvider, CompletionProviderError, Message, Role,
};
use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};
use crate::application::services::{
    ChunkingStrategy, DocumentProcessorService, QaOrchestrator, QaSettings, TextChunker,
};
use crate::config::AppConfig;
use crate::domain::repositories::KnowledgeBase;
use crate::infrastructure::AppContainer;
use crate::infrastructure::external_services::document_parsers::CompositeDocumentParser;
use crate::infrastructure::memory::InMemoryKnowledgeBase;

/// Bag-of-words vectors: each lowercased word is hashed into one dimension,
/// so texts sharing words have positive cosine similarity.
pub struct HashingEmbeddingProvider {
    dimensions: usize,
}

impl Default for HashingEmbeddingProvider {
    fn default() -> Self {
        Self { dimensions: 1024 }
    }
}

impl HashingEmbeddingProvider {
    fn vectorize(&self, text: &str) -> Vector {
        let mut values = vec![0.0f32; self.dimensions];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            values[(hasher.finish() % self.dimensions as u64) as usize] += 1.0;
        }
        Vector::from(values)
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vector, EmbeddingProviderError> {
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingProviderError> {
        Ok(texts.iter().map(|text| self.vectorize(text)).collect())
    }
}

pub struct FailingEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for FailingEmbeddingProvider {
    async fn embed(&self, _text: &str) -> Result<Vector, EmbeddingProviderError> {
        Err(EmbeddingProviderError::ServiceUnavailable)
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vector>, EmbeddingProviderError> {
        Err(EmbeddingProviderError::ServiceUnavailable)
    }
}

/// Answers with the user prompt it was given, so assertions can look for
/// context text in the answer.
pub struct EchoCompletionProvider;

#[async_trait]
impl CompletionProvider for EchoCompletionProvider {
    async fn complete(&self, messages: &[Message]) -> Result<Completion, CompletionProviderError> {
        let content = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();

        Ok(Completion {
            content,
            usage: None,
        })
    }
}

pub struct FailingCompletionProvider;

#[async_trait]
impl CompletionProvider for FailingCompletionProvider {
    async fn complete(&self, _messages: &[Message]) -> Result<Completion, CompletionProviderError> {
        Err(CompletionProviderError::ApiError {
            status: 503,
            body: "unavailable".to_string(),
        })
    }
}

pub fn processor(knowledge_base: Arc<dyn KnowledgeBase>) -> DocumentProcessorService {
    DocumentProcessorService::new(
        Arc::new(CompositeDocumentParser::new()),
        Arc::new(HashingEmbeddingProvider::default()),
        knowledge_base,
        TextChunker::new(ChunkingStrategy::FixedSize, 500),
    )
}

pub fn orchestrator(knowledge_base: Arc<dyn KnowledgeBase>) -> QaOrchestrator {
    QaOrchestrator::new(
        Arc::new(HashingEmbeddingProvider::default()),
        knowledge_base,
        Arc::new(EchoCompletionProvider),
        QaSettings::default(),
    )
}

fn app_with(config: AppConfig, completion_provider: Arc<dyn CompletionProvider>) -> Router {
    AppContainer::assemble(
        &config,
        Arc::new(InMemoryKnowledgeBase::new()),
        Arc::new(HashingEmbeddingProvider::default()),
        completion_provider,
    )
    .http_server()
    .router()
}

/// The full HTTP router over an in-memory knowledge base.
pub fn app() -> Router {
    app_with(default_config(), Arc::new(EchoCompletionProvider))
}

pub fn app_with_failing_llm() -> Router {
    app_with(default_config(), Arc::new(FailingCompletionProvider))
}

pub fn app_with_upload_limit(max_upload_bytes: usize) -> Router {
    let mut config = default_config();
    config.max_upload_bytes = max_upload_bytes;
    app_with(config, Arc::new(EchoCompletionProvider))
}

fn default_config() -> AppConfig {
    AppConfig::from_lookup(|_| None).unwrap()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn paragraph(text: &str) -> String {
    format!(
        "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        escape(text)
    )
}

/// A minimal .docx holding `paragraphs` followed by one table of `rows`.
pub fn docx_with_table(paragraphs: &[&str], rows: &[&[&str]]) -> Vec<u8> {
    let mut body: String = paragraphs.iter().map(|p| paragraph(p)).collect();

    if !rows.is_empty() {
        body.push_str("<w:tbl><w:tblPr/>");
        for row in rows {
            body.push_str("<w:tr>");
            for cell in row.iter() {
                body.push_str(&format!("<w:tc><w:tcPr/>{}</w:tc>", paragraph(cell)));
            }
            body.push_str("</w:tr>");
        }
        body.push_str("</w:tbl>");
    }

    let document = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}</w:body></w:document>",
        body
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.start_file("[Content_Types].xml", options).unwrap();
    writer
        .write_all(
            b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
              <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
              <Override PartName=\"/word/document.xml\" \
              ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>\
              </Types>",
        )
        .unwrap();
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(document.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}
