use serde::{Deserialize, Serialize};

use crate::application::use_cases::AskQuestionResponse;

#[derive(Debug, Deserialize)]
pub struct AskQuestionRequestDto {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskQuestionResponseDto {
    pub question: String,
    pub answer: String,
    pub sources: Vec<String>,
    pub agent_used: String,
    pub documents: Vec<String>,
}

impl From<AskQuestionResponse> for AskQuestionResponseDto {
    fn from(response: AskQuestionResponse) -> Self {
        let answer = response.answer;

        Self {
            question: response.question,
            sources: answer.sources(),
            agent_used: answer.path().label().to_string(),
            documents: answer.documents().to_vec(),
            answer: answer.text().to_string(),
        }
    }
}
