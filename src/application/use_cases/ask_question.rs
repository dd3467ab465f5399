use std::sync::Arc;

use crate::application::services::qa_orchestrator::{QaError, QaOrchestrator};
use crate::domain::entities::{Answer, Question};

#[derive(Debug, thiserror::Error)]
pub enum AskQuestionError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),
    #[error("Retrieval error: {0}")]
    RetrievalError(String),
    #[error("No relevant information found in the uploaded documents")]
    NoRelevantData,
    #[error("Synthesis error: {0}")]
    SynthesisError(String),
}

impl From<QaError> for AskQuestionError {
    fn from(error: QaError) -> Self {
        match error {
            QaError::InvalidQuestion(msg) => AskQuestionError::InvalidQuestion(msg),
            QaError::RetrievalError(msg) => AskQuestionError::RetrievalError(msg),
            QaError::NoRelevantData => AskQuestionError::NoRelevantData,
            QaError::SynthesisError(msg) => AskQuestionError::SynthesisError(msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AskQuestionRequest {
    pub question: String,
}

#[derive(Debug, Clone)]
pub struct AskQuestionResponse {
    pub question: String,
    pub answer: Answer,
}

pub struct AskQuestionUseCase {
    orchestrator: Arc<QaOrchestrator>,
}

impl AskQuestionUseCase {
    pub fn new(orchestrator: Arc<QaOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn execute(
        &self,
        request: AskQuestionRequest,
    ) -> Result<AskQuestionResponse, AskQuestionError> {
        let question = Question::new(request.question);
        let answer = self.orchestrator.answer(&question).await?;

        Ok(AskQuestionResponse {
            question: question.text().to_string(),
            answer,
        })
    }
}
