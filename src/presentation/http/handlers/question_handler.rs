use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::{AskQuestionRequest, AskQuestionUseCase};
use crate::presentation::http::dto::{AskQuestionRequestDto, AskQuestionResponseDto};
use crate::presentation::http::errors::HttpError;

pub struct QuestionHandler {
    ask_use_case: Arc<AskQuestionUseCase>,
}

impl QuestionHandler {
    pub fn new(ask_use_case: Arc<AskQuestionUseCase>) -> Self {
        Self { ask_use_case }
    }

    pub async fn ask_question(
        State(handler): State<Arc<QuestionHandler>>,
        payload: Result<Json<AskQuestionRequestDto>, JsonRejection>,
    ) -> Result<impl IntoResponse, HttpError> {
        let Json(request) = payload.map_err(|e| {
            HttpError::invalid_request("Expected a JSON body with a \"question\" field")
                .with_details(e.body_text())
        })?;

        let response = handler
            .ask_use_case
            .execute(AskQuestionRequest {
                question: request.question,
            })
            .await?;

        Ok((StatusCode::OK, Json(AskQuestionResponseDto::from(response))))
    }
}
