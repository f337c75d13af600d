//! Plain-text extraction for the model prompts.
//!
//! PDFs yield one entry per page. A DOCX has no reliable page boundaries, so
//! the whole body is reported as page 1.

use crate::core::{
    errors::{AppError, AppResult},
    types::{DocumentFormat, PageText},
};
use crate::document::package::DocxPackage;

pub fn extract_pages(bytes: &[u8], format: DocumentFormat) -> AppResult<Vec<PageText>> {
    match format {
        DocumentFormat::Pdf => extract_pdf_pages(bytes),
        DocumentFormat::Docx => Ok(vec![PageText {
            page: 1,
            text: extract_docx_text(bytes)?,
        }]),
    }
}

/// All pages joined with newlines.
pub fn full_text(pages: &[PageText]) -> String {
    pages
        .iter()
        .map(|page| page.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Non-blank body paragraphs of a DOCX, in document order.
pub fn extract_paragraphs(bytes: &[u8]) -> AppResult<Vec<String>> {
    Ok(DocxPackage::open(bytes)?.paragraph_texts())
}

// ── PDF ───────────────────────────────────────────────────────────────────────

fn extract_pdf_pages(bytes: &[u8]) -> AppResult<Vec<PageText>> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| AppError::UnsupportedFormat(format!("failed to read PDF: {e}")))?;

    if pages.iter().all(|text| text.trim().is_empty()) {
        tracing::warn!(
            pages = pages.len(),
            "PDF contains no extractable text (may be image-based or encrypted)"
        );
    }

    Ok(pages
        .into_iter()
        .enumerate()
        .map(|(index, text)| PageText {
            page: index as u32 + 1,
            text,
        })
        .collect())
}

// ── DOCX ──────────────────────────────────────────────────────────────────────

fn extract_docx_text(bytes: &[u8]) -> AppResult<String> {
    match extract_docx_with_docx_rs(bytes) {
        Ok(text) => Ok(text),
        Err(primary_err) => match DocxPackage::open(bytes) {
            Ok(package) => {
                tracing::debug!(error = %primary_err, "docx-rs failed, using package reader");
                Ok(package.paragraph_texts().join("\n"))
            }
            Err(fallback_err) => Err(AppError::UnsupportedFormat(format!(
                "failed to read DOCX (docx-rs: {primary_err}; xml fallback: {fallback_err})"
            ))),
        },
    }
}

fn extract_docx_with_docx_rs(bytes: &[u8]) -> AppResult<String> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| AppError::Document(format!("docx-rs failed: {e}")))?;

    let mut lines: Vec<String> = Vec::new();
    for child in &docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(para) = child {
            let mut buf = String::new();
            paragraph_children_text(&para.children, &mut buf);
            if !buf.trim().is_empty() {
                lines.push(buf);
            }
        }
    }

    Ok(lines.join("\n"))
}

/// Runs directly in the paragraph, inside hyperlinks and inside tracked
/// insertions. Deleted text is skipped.
fn paragraph_children_text(children: &[docx_rs::ParagraphChild], buf: &mut String) {
    for child in children {
        match child {
            docx_rs::ParagraphChild::Run(run) => run_text(run, buf),
            docx_rs::ParagraphChild::Hyperlink(link) => paragraph_children_text(&link.children, buf),
            docx_rs::ParagraphChild::Insert(insert) => {
                for inserted in &insert.children {
                    if let docx_rs::InsertChild::Run(run) = inserted {
                        run_text(run, buf);
                    }
                }
            }
            _ => {}
        }
    }
}

fn run_text(run: &docx_rs::Run, buf: &mut String) {
    for r in &run.children {
        match r {
            docx_rs::RunChild::Text(t) => buf.push_str(&t.text),
            docx_rs::RunChild::Tab(_) => buf.push('\t'),
            docx_rs::RunChild::Break(_) => buf.push('\n'),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed(docx: docx_rs::Docx) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).expect("pack docx");
        cursor.into_inner()
    }

    #[test]
    fn hyperlink_and_inserted_text_reach_the_prompt() {
        let paragraph = docx_rs::Paragraph::new()
            .add_run(docx_rs::Run::new().add_text("See "))
            .add_hyperlink(
                docx_rs::Hyperlink::new("terms", docx_rs::HyperlinkType::Anchor)
                    .add_run(docx_rs::Run::new().add_text("teh terms")),
            )
            .add_insert(docx_rs::Insert::new(docx_rs::Run::new().add_text(" now")))
            .add_run(docx_rs::Run::new().add_text("."));
        let bytes = packed(docx_rs::Docx::new().add_paragraph(paragraph));

        let text = extract_docx_with_docx_rs(&bytes).expect("docx-rs text");
        assert_eq!(text, "See teh terms now.");
    }
}
