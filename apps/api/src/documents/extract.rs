//! Document Extractor: turns stored resume bytes into plain text.
//!
//! The format is taken from the file name suffix only; content is never sniffed.
//! Extraction is read-only and deterministic for a given input.

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use thiserror::Error;

pub const UTF8: &str = "utf-8";
pub const LATIN1: &str = "iso-8859-1";
pub const WINDOWS_1252: &str = "windows-1252";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unable to read PDF: {0}")]
    Pdf(String),

    #[error("Unable to read DOCX: {0}")]
    Docx(String),

    #[error("Unable to decode text with any of the attempted encodings: {attempted:?}")]
    Decode { attempted: Vec<&'static str> },
}

impl ExtractError {
    pub fn code(&self) -> &'static str {
        match self {
            ExtractError::Pdf(_) | ExtractError::Docx(_) => "EXTRACT_ERROR",
            ExtractError::Decode { .. } => "DECODE_ERROR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    /// `.pdf` and `.docx` (any case) are binary formats; everything else is text.
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            DocumentKind::Pdf
        } else if lower.ends_with(".docx") {
            DocumentKind::Docx
        } else {
            DocumentKind::Text
        }
    }
}

/// Extracts plain text. Text documents must be valid UTF-8.
pub fn extract_text(content: &[u8], kind: DocumentKind) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::Pdf => extract_pdf(content),
        DocumentKind::Docx => extract_docx(content),
        DocumentKind::Text => std::str::from_utf8(content)
            .map(str::to_owned)
            .map_err(|_| ExtractError::Decode {
                attempted: vec![UTF8],
            }),
    }
}

/// Like [`extract_text`], but text documents fall back through
/// UTF-8, ISO-8859-1 and Windows-1252 before giving up.
pub fn extract_text_lenient(content: &[u8], kind: DocumentKind) -> Result<String, ExtractError> {
    match kind {
        DocumentKind::Text => decode_text_with_fallback(content),
        other => extract_text(content, other),
    }
}

pub fn decode_text_with_fallback(content: &[u8]) -> Result<String, ExtractError> {
    let decoders: [(&'static str, fn(&[u8]) -> Option<String>); 3] = [
        (UTF8, |b| std::str::from_utf8(b).ok().map(str::to_owned)),
        (LATIN1, |b| Some(b.iter().map(|&byte| byte as char).collect())),
        (WINDOWS_1252, |b| {
            let (text, had_errors) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(b);
            (!had_errors).then(|| text.into_owned())
        }),
    ];

    let mut attempted = Vec::with_capacity(decoders.len());
    for (label, decode) in decoders {
        attempted.push(label);
        if let Some(text) = decode(content) {
            if label != UTF8 {
                tracing::debug!("Decoded text document as {label}");
            }
            return Ok(text);
        }
    }
    Err(ExtractError::Decode { attempted })
}

fn extract_pdf(content: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed font tables instead of returning an error.
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(content))
        .map_err(|_| ExtractError::Pdf("extractor aborted on malformed content".to_string()))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;
    // pdf-extract frames every page with line breaks of its own; a blank page is "".
    let pages: Vec<&str> = pages
        .iter()
        .map(|page| page.trim_matches(|c: char| c == '\n' || c == '\r'))
        .collect();
    Ok(pages.join("\n"))
}

fn extract_docx(content: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(content).map_err(|e| ExtractError::Docx(e.to_string()))?;
    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect();
    Ok(paragraphs.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Run};
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut doc = Docx::new();
        for p in paragraphs {
            doc = doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*p)));
        }
        let mut buf = std::io::Cursor::new(Vec::new());
        doc.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    /// One page per entry; an empty entry becomes a page with no text.
    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let operations = if text.is_empty() {
                Vec::new()
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_kind_from_filename() {
        assert_eq!(DocumentKind::from_filename("cv.pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("CV.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("cv.docx"), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_filename("cv.doc"), DocumentKind::Text);
        assert_eq!(DocumentKind::from_filename("notes.txt"), DocumentKind::Text);
        assert_eq!(DocumentKind::from_filename("pdf"), DocumentKind::Text);
    }

    #[test]
    fn test_plain_text_utf8() {
        let text = extract_text("Résumé — Rust".as_bytes(), DocumentKind::Text).unwrap();
        assert_eq!(text, "Résumé — Rust");
    }

    #[test]
    fn test_invalid_utf8_names_attempted_encoding() {
        let err = extract_text(&[0x52, 0xE9, 0x73], DocumentKind::Text).unwrap_err();
        match err {
            ExtractError::Decode { attempted } => assert_eq!(attempted, vec![UTF8]),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_fallback_decodes_latin1() {
        // "Résumé" in ISO-8859-1
        let bytes = [0x52, 0xE9, 0x73, 0x75, 0x6D, 0xE9];
        assert_eq!(decode_text_with_fallback(&bytes).unwrap(), "Résumé");
        assert_eq!(
            extract_text_lenient(&bytes, DocumentKind::Text).unwrap(),
            "Résumé"
        );
    }

    #[test]
    fn test_fallback_prefers_utf8() {
        assert_eq!(decode_text_with_fallback("naïve".as_bytes()).unwrap(), "naïve");
    }

    #[test]
    fn test_docx_paragraphs_in_order() {
        let bytes = build_docx(&["Jane Doe", "Senior Engineer", "Rust, SQL"]);
        let text = extract_text(&bytes, DocumentKind::Docx).unwrap();
        assert_eq!(text, "Jane Doe\nSenior Engineer\nRust, SQL");
    }

    #[test]
    fn test_docx_extraction_is_idempotent() {
        let bytes = build_docx(&["one", "two"]);
        let a = extract_text(&bytes, DocumentKind::Docx).unwrap();
        let b = extract_text(&bytes, DocumentKind::Docx).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_garbage_docx_is_an_error() {
        let err = extract_text(b"definitely not a zip", DocumentKind::Docx).unwrap_err();
        assert!(matches!(err, ExtractError::Docx(_)));
    }

    #[test]
    fn test_pdf_pages_in_order_with_blank_page() {
        let bytes = build_pdf(&["Alpha", "", "Gamma"]);
        let text = extract_text(&bytes, DocumentKind::Pdf).unwrap();
        assert_eq!(text, "Alpha\n\nGamma");
    }

    #[test]
    fn test_single_page_pdf() {
        let bytes = build_pdf(&["Summary"]);
        assert_eq!(extract_text(&bytes, DocumentKind::Pdf).unwrap(), "Summary");
    }

    #[test]
    fn test_garbage_pdf_is_an_error() {
        let err = extract_text(b"not a pdf at all", DocumentKind::Pdf).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
