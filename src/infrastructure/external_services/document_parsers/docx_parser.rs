use std::io::{Cursor, Read};

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::application::ports::document_parser::{
    DocumentParseError, DocumentParser, ExtractedContent, ExtractedTable,
};
use crate::domain::value_objects::DocumentFormat;

const MAIN_PART: &str = "word/document.xml";

/// Reads the main part of a Word document. Paragraphs outside tables become
/// prose; each top-level `w:tbl` becomes one table, with anything nested in
/// a cell (paragraphs, inner tables) folded into that cell's text.
/// Merged cells are expanded so every row keeps the grid's column count:
/// a `w:gridSpan` cell repeats across the columns it covers and a
/// `w:vMerge` continuation repeats the text of the cell above it.
#[derive(Debug, Default)]
pub struct DocxParser;

impl DocxParser {
    pub fn new() -> Self {
        Self
    }

    fn read_main_part(data: &[u8]) -> Result<String, DocumentParseError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))
            .map_err(|e| DocumentParseError::CorruptedFile(e.to_string()))?;

        let mut part = archive
            .by_name(MAIN_PART)
            .map_err(|e| DocumentParseError::CorruptedFile(format!("{}: {}", MAIN_PART, e)))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| DocumentParseError::CorruptedFile(e.to_string()))?;

        Ok(xml)
    }

    fn extract(xml: &str) -> Result<ExtractedContent, DocumentParseError> {
        let mut reader = Reader::from_str(xml);

        let mut paragraphs: Vec<String> = Vec::new();
        let mut tables: Vec<ExtractedTable> = Vec::new();

        let mut paragraph = String::new();
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut row: Vec<String> = Vec::new();
        let mut cell = String::new();
        let mut span = 1usize;
        let mut continues_merge = false;
        let mut table_depth = 0usize;
        let mut in_text = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"tbl" => {
                        table_depth += 1;
                        if table_depth == 1 {
                            rows.clear();
                        }
                    }
                    b"tr" if table_depth == 1 => row.clear(),
                    b"tc" if table_depth == 1 => {
                        cell.clear();
                        span = 1;
                        continues_merge = false;
                    }
                    b"gridSpan" | b"vMerge" if table_depth == 1 => {
                        read_merge(&e, &mut span, &mut continues_merge)
                    }
                    b"t" => in_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"tab" | b"br" if table_depth > 0 => cell.push(' '),
                    b"tab" | b"br" => paragraph.push(' '),
                    b"gridSpan" | b"vMerge" if table_depth == 1 => {
                        read_merge(&e, &mut span, &mut continues_merge)
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) if in_text => {
                    let text = e
                        .unescape()
                        .map_err(|e| DocumentParseError::ExtractionFailed(e.to_string()))?;
                    if table_depth > 0 {
                        cell.push_str(&text);
                    } else {
                        paragraph.push_str(&text);
                    }
                }
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"p" if table_depth > 0 => cell.push(' '),
                    b"p" => {
                        let text = paragraph.trim();
                        if !text.is_empty() {
                            paragraphs.push(text.to_string());
                        }
                        paragraph.clear();
                    }
                    b"tc" if table_depth == 1 => {
                        let text = if continues_merge {
                            rows.last()
                                .and_then(|above| above.get(row.len()))
                                .cloned()
                                .unwrap_or_default()
                        } else {
                            normalize_cell(&cell)
                        };
                        row.extend(std::iter::repeat_n(text, span));
                        cell.clear();
                    }
                    b"tr" if table_depth == 1 => rows.push(std::mem::take(&mut row)),
                    b"tbl" => {
                        table_depth = table_depth.saturating_sub(1);
                        if table_depth == 0 {
                            let table = ExtractedTable::new(std::mem::take(&mut rows));
                            if !table.is_blank() {
                                tables.push(table);
                            }
                        } else {
                            // Inner table cells read as one run of text.
                            cell.push(' ');
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(DocumentParseError::CorruptedFile(e.to_string())),
                _ => {}
            }
        }

        Ok(ExtractedContent {
            text: paragraphs.join("\n"),
            tables,
        })
    }
}

/// Applies a `w:gridSpan` or `w:vMerge` cell property. A `vMerge` without
/// `w:val="restart"` continues the merge from the row above.
fn read_merge(element: &BytesStart, span: &mut usize, continues_merge: &mut bool) {
    let value = element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"val")
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned());

    match element.local_name().as_ref() {
        b"gridSpan" => {
            *span = value
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(1);
        }
        b"vMerge" => *continues_merge = value.as_deref() != Some("restart"),
        _ => {}
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl DocumentParser for DocxParser {
    async fn parse(
        &self,
        data: &[u8],
        format: DocumentFormat,
    ) -> Result<ExtractedContent, DocumentParseError> {
        if format != DocumentFormat::Docx {
            return Err(DocumentParseError::UnsupportedFormat(format.to_string()));
        }

        let xml = Self::read_main_part(data)?;
        Self::extract(&xml)
    }

    fn supported_formats(&self) -> Vec<DocumentFormat> {
        vec![DocumentFormat::Docx]
    }
}
