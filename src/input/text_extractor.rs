//! Plain text extraction from resume files

use crate::error::{AtsMatchError, Result};
use pulldown_cmark::{Event, Parser, Tag};
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;
use zip::ZipArchive;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            AtsMatchError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;
        Ok(tidy_lines(&text))
    }
}

/// Reads the body of a Word package. Paragraphs become lines and list
/// paragraphs keep a `- ` marker.
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        docx_to_text(&bytes).map_err(|e| match e {
            AtsMatchError::DocxExtraction(msg) => {
                AtsMatchError::DocxExtraction(format!("Failed to extract text from DOCX '{}': {}", path.display(), msg))
            }
            other => other,
        })
    }
}

pub fn docx_to_text(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AtsMatchError::DocxExtraction(format!("not a DOCX package: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| AtsMatchError::DocxExtraction(format!("word/document.xml: {}", e)))?
        .read_to_string(&mut xml)?;

    document_xml_to_text(&xml)
}

/// Text of `word/document.xml`, one line per `w:p`.
fn document_xml_to_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut paragraph = String::new();
    let mut in_text = false;
    let mut listed = false;

    loop {
        match reader.read_event() {
            Ok(XmlEvent::Start(e)) => match e.local_name().as_ref() {
                b"p" => {
                    paragraph.clear();
                    listed = false;
                }
                b"t" => in_text = true,
                b"numPr" => listed = true,
                _ => {}
            },
            Ok(XmlEvent::Empty(e)) => match e.local_name().as_ref() {
                b"p" => out.push('\n'),
                b"tab" => paragraph.push('\t'),
                b"br" | b"cr" => paragraph.push('\n'),
                _ => {}
            },
            Ok(XmlEvent::Text(e)) if in_text => {
                let text = e.unescape().map_err(malformed_xml)?;
                paragraph.push_str(&text);
            }
            Ok(XmlEvent::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if listed && !paragraph.trim().is_empty() {
                        out.push_str("- ");
                    }
                    out.push_str(paragraph.trim());
                    out.push('\n');
                }
                _ => {}
            },
            Ok(XmlEvent::Eof) => break,
            Err(e) => return Err(malformed_xml(e)),
            _ => {}
        }
    }

    Ok(tidy_lines(&out))
}

fn malformed_xml(err: quick_xml::Error) -> AtsMatchError {
    AtsMatchError::DocxExtraction(format!("malformed document.xml: {}", err))
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(tidy_lines(&content))
    }
}

/// Flattens markdown to text, keeping list items as `- ` lines so the
/// resume's structure survives into the prompt.
pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown))
    }
}

pub fn markdown_to_text(markdown: &str) -> String {
    let mut out = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Item) => out.push_str("- "),
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::End(Tag::Paragraph | Tag::Heading(..)) => out.push_str("\n\n"),
            Event::End(Tag::Item) => out.push('\n'),
            Event::End(Tag::List(_)) => out.push('\n'),
            _ => {}
        }
    }

    tidy_lines(&out)
}

/// Trim every line and collapse runs of blank lines to one.
pub fn tidy_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim_end) {
        let blank = line.trim().is_empty();
        if blank && lines.last().map_or(true, |last| last.is_empty()) {
            continue;
        }
        lines.push(if blank { "" } else { line });
    }
    while lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_keeps_list_items() {
        let text = markdown_to_text("# Jane Doe\n\n**Engineer** at `Acme`\n\n- Rust\n- Go\n");
        assert_eq!(text, "Jane Doe\n\nEngineer at Acme\n\n- Rust\n- Go");
    }

    #[test]
    fn test_document_xml_paragraphs_and_lists() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
            <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
            <w:p/>
            <w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr>
                <w:r><w:t xml:space="preserve">Rust </w:t></w:r><w:r><w:t>&amp; Go</w:t></w:r></w:p>
            <w:p><w:r><w:t>2020</w:t><w:tab/><w:t>2022</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let text = document_xml_to_text(xml).unwrap();
        assert_eq!(text, "Jane Doe\n\n- Rust & Go\n2020\t2022");
    }

    #[test]
    fn test_docx_rejects_non_packages() {
        assert!(matches!(docx_to_text(b"plain bytes"), Err(AtsMatchError::DocxExtraction(_))));
    }

    #[test]
    fn test_tidy_lines() {
        assert_eq!(tidy_lines("\n\nA  \n\n\n\nB\n\n"), "A\n\nB");
        assert_eq!(tidy_lines("   \n"), "");
    }
}
