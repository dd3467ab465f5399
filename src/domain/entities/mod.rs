pub mod answer;
pub mod document;
pub mod question;
pub mod table_chunk;
pub mod text_chunk;

pub use answer::Answer;
pub use document::Document;
pub use question::Question;
pub use table_chunk::TableChunk;
pub use text_chunk::TextChunk;
