pub mod composite_parser;
pub mod csv_parser;
pub mod docx_parser;
pub mod pdf_parser;
pub mod text_parser;

pub use composite_parser::CompositeDocumentParser;
pub use csv_parser::CsvParser;
pub use docx_parser::DocxParser;
pub use pdf_parser::PdfParser;
pub use text_parser::TextParser;
