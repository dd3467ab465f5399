use axum::{Router, routing::post};
use std::sync::Arc;

use crate::presentation::http::handlers::QuestionHandler;

pub fn question_routes(question_handler: Arc<QuestionHandler>) -> Router {
    Router::new()
        .route("/ask-question", post(QuestionHandler::ask_question))
        .route("/ask-question/", post(QuestionHandler::ask_question))
        .with_state(question_handler)
}
