pub mod document_handler;
pub mod question_handler;

pub use document_handler::DocumentHandler;
pub use question_handler::QuestionHandler;
