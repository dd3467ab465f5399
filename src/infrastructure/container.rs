use std::sync::Arc;

use crate::{
    application::{
        ports::{CompletionProvider, DocumentParser, EmbeddingProvider},
        services::{DocumentProcessorService, QaOrchestrator, TextChunker},
        use_cases::{
            AskQuestionUseCase, DeleteDocumentUseCase, GetDocumentUseCase, ListDocumentsUseCase,
            UploadDocumentsUseCase,
        },
    },
    config::AppConfig,
    domain::repositories::KnowledgeBase,
    infrastructure::{
        database::{PostgresKnowledgeBase, create_connection_pool, run_migrations},
        external_services::{
            ChatCompletionClient, InferenceClient, InferenceEmbeddingProvider,
            document_parsers::CompositeDocumentParser,
        },
        memory::InMemoryKnowledgeBase,
    },
    presentation::http::{
        HttpServer,
        handlers::{DocumentHandler, QuestionHandler},
    },
};

pub struct AppContainer {
    pub knowledge_base: Arc<dyn KnowledgeBase>,
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub completion_provider: Arc<dyn CompletionProvider>,
    pub document_parser: Arc<dyn DocumentParser>,

    pub document_processor: Arc<DocumentProcessorService>,
    pub qa_orchestrator: Arc<QaOrchestrator>,

    pub document_handler: Arc<DocumentHandler>,
    pub question_handler: Arc<QuestionHandler>,

    port: u16,
    max_upload_bytes: usize,
}

impl AppContainer {
    pub fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let knowledge_base: Arc<dyn KnowledgeBase> = match &config.database_url {
            Some(database_url) => {
                let pool = create_connection_pool(database_url, config.database_pool_size)?;
                run_migrations(&pool)
                    .map_err(|e| format!("Failed to run database migrations: {}", e))?;
                tracing::info!("Using PostgreSQL knowledge base");
                Arc::new(PostgresKnowledgeBase::new(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, documents are kept in memory only");
                Arc::new(InMemoryKnowledgeBase::new())
            }
        };

        let embedding_provider: Arc<dyn EmbeddingProvider> = Arc::new(
            InferenceEmbeddingProvider::new(InferenceClient::new(config.embeddings.clone())?),
        );

        if config.completion.api_key.is_empty() {
            tracing::warn!("LLM_API_KEY not set, completion requests will be unauthenticated");
        }
        let completion_provider: Arc<dyn CompletionProvider> =
            Arc::new(ChatCompletionClient::new(config.completion.clone())?);

        Ok(Self::assemble(
            config,
            knowledge_base,
            embedding_provider,
            completion_provider,
        ))
    }

    /// Wires services, use cases and handlers around the given adapters.
    pub fn assemble(
        config: &AppConfig,
        knowledge_base: Arc<dyn KnowledgeBase>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        completion_provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        let document_parser: Arc<dyn DocumentParser> = Arc::new(CompositeDocumentParser::new());

        let document_processor = Arc::new(DocumentProcessorService::new(
            document_parser.clone(),
            embedding_provider.clone(),
            knowledge_base.clone(),
            TextChunker::new(config.chunk_strategy, config.chunk_size),
        ));

        let qa_orchestrator = Arc::new(QaOrchestrator::new(
            embedding_provider.clone(),
            knowledge_base.clone(),
            completion_provider.clone(),
            config.qa.clone(),
        ));

        let upload_use_case = Arc::new(UploadDocumentsUseCase::new(document_processor.clone()));
        let list_use_case = Arc::new(ListDocumentsUseCase::new(knowledge_base.clone()));
        let get_use_case = Arc::new(GetDocumentUseCase::new(knowledge_base.clone()));
        let delete_use_case = Arc::new(DeleteDocumentUseCase::new(knowledge_base.clone()));
        let ask_use_case = Arc::new(AskQuestionUseCase::new(qa_orchestrator.clone()));

        let document_handler = Arc::new(DocumentHandler::new(
            upload_use_case,
            list_use_case,
            get_use_case,
            delete_use_case,
        ));
        let question_handler = Arc::new(QuestionHandler::new(ask_use_case));

        Self {
            knowledge_base,
            embedding_provider,
            completion_provider,
            document_parser,
            document_processor,
            qa_orchestrator,
            document_handler,
            question_handler,
            port: config.port,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn http_server(&self) -> HttpServer {
        HttpServer::new(
            self.document_handler.clone(),
            self.question_handler.clone(),
            self.port,
            self.max_upload_bytes,
        )
    }
}
