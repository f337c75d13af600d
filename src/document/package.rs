//! DOCX package access.
//!
//! Body paragraphs of `word/document.xml` are lifted into the
//! [`Paragraph`]/[`Run`] model together with their byte ranges. Saving splices
//! only the paragraphs an applier touched back into the original XML and
//! raw-copies every other part of the zip, so untouched content survives
//! unchanged.
//!
//! A rewritten paragraph is re-rendered from the model. A paragraph whose runs
//! were only highlighted keeps its original XML; each run gets its
//! `w:highlight` element inserted or replaced in place.

use std::io::{Cursor, Read, Write};
use std::ops::Range;

use zip::{write::SimpleFileOptions, CompressionMethod, ZipArchive, ZipWriter};

use crate::core::errors::{AppError, AppResult};
use crate::document::model::{Edit, Paragraph, Run, RunFormat};

pub const DOCUMENT_PART: &str = "word/document.xml";

// CT_RPr children that must come after `w:highlight`.
const AFTER_HIGHLIGHT: &[&str] = &[
    "u",
    "effect",
    "bdr",
    "shd",
    "fitText",
    "vertAlign",
    "rtl",
    "cs",
    "em",
    "lang",
    "eastAsianLayout",
    "specVanish",
    "oMath",
    "rPrChange",
];

/// Where a run's highlight goes in the original XML: `range` is replaced by a
/// highlight element, wrapped in a fresh `w:rPr` when `wrap` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HighlightSlot {
    range: Range<usize>,
    wrap: bool,
}

#[derive(Debug)]
struct BodyParagraph {
    paragraph: Paragraph,
    span: Range<usize>,
    slots: Vec<Option<HighlightSlot>>,
}

#[derive(Debug, Clone)]
pub struct DocxPackage {
    source: Vec<u8>,
    xml: String,
    prefix: String,
    paragraphs: Vec<Paragraph>,
    spans: Vec<Range<usize>>,
    // one entry per run of the matching paragraph
    slots: Vec<Vec<Option<HighlightSlot>>>,
}

impl DocxPackage {
    pub fn open(bytes: &[u8]) -> AppResult<Self> {
        let xml = read_document_xml(bytes)?;
        let (prefix, parsed) = parse_body(&xml)?;

        let mut paragraphs = Vec::with_capacity(parsed.len());
        let mut spans = Vec::with_capacity(parsed.len());
        let mut slots = Vec::with_capacity(parsed.len());
        for body in parsed {
            paragraphs.push(body.paragraph);
            spans.push(body.span);
            slots.push(body.slots);
        }

        Ok(Self {
            source: bytes.to_vec(),
            xml,
            prefix,
            paragraphs,
            spans,
            slots,
        })
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraphs_mut(&mut self) -> &mut [Paragraph] {
        &mut self.paragraphs
    }

    /// Text of every paragraph that is not blank, untrimmed.
    pub fn paragraph_texts(&self) -> Vec<String> {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .filter(|text| !text.trim().is_empty())
            .collect()
    }

    /// `word/document.xml` with every edited paragraph written back.
    pub fn document_xml(&self) -> String {
        let mut out = String::with_capacity(self.xml.len());
        let mut cursor = 0;
        for ((paragraph, span), slots) in self.paragraphs.iter().zip(&self.spans).zip(&self.slots) {
            let rendered = match paragraph.edit() {
                Edit::Clean => continue,
                Edit::Restyled => self.restyle_paragraph(paragraph, span, slots),
                Edit::Rewritten => render_paragraph(&self.prefix, paragraph),
            };
            out.push_str(&self.xml[cursor..span.start]);
            out.push_str(&rendered);
            cursor = span.end;
        }
        out.push_str(&self.xml[cursor..]);
        out
    }

    /// The original paragraph XML with each run's highlight spliced in.
    fn restyle_paragraph(
        &self,
        paragraph: &Paragraph,
        span: &Range<usize>,
        slots: &[Option<HighlightSlot>],
    ) -> String {
        let mut out = String::with_capacity(span.len() + 64 * slots.len());
        let mut cursor = span.start;
        for (run, slot) in paragraph.runs().iter().zip(slots) {
            let (Some(slot), Some(color)) = (slot, run.format.highlight.as_deref()) else {
                continue;
            };
            out.push_str(&self.xml[cursor..slot.range.start]);
            let highlight = render_highlight(&self.prefix, color);
            if slot.wrap {
                let prefix = &self.prefix;
                out.push_str(&format!("<{prefix}:rPr>{highlight}</{prefix}:rPr>"));
            } else {
                out.push_str(&highlight);
            }
            cursor = slot.range.end;
        }
        out.push_str(&self.xml[cursor..span.end]);
        out
    }

    pub fn save(&self) -> AppResult<Vec<u8>> {
        if !self.paragraphs.iter().any(Paragraph::is_dirty) {
            return Ok(self.source.clone());
        }

        let xml = self.document_xml();
        let mut archive = ZipArchive::new(Cursor::new(self.source.as_slice()))?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for index in 0..archive.len() {
            let entry = archive
                .by_index_raw(index)
                .map_err(|err| AppError::Document(format!("cannot read zip entry {index}: {err}")))?;
            if entry.name() == DOCUMENT_PART {
                writer
                    .start_file(DOCUMENT_PART, options)
                    .map_err(|err| AppError::Document(format!("cannot write {DOCUMENT_PART}: {err}")))?;
                writer.write_all(xml.as_bytes())?;
            } else {
                writer
                    .raw_copy_file(entry)
                    .map_err(|err| AppError::Document(format!("cannot copy zip entry: {err}")))?;
            }
        }

        let cursor = writer
            .finish()
            .map_err(|err| AppError::Document(format!("cannot finish DOCX package: {err}")))?;
        Ok(cursor.into_inner())
    }
}

fn read_document_xml(bytes: &[u8]) -> AppResult<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|err| AppError::UnsupportedFormat(format!("{DOCUMENT_PART} missing: {err}")))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|err| AppError::UnsupportedFormat(format!("cannot read {DOCUMENT_PART}: {err}")))?;
    Ok(xml)
}

fn parse_body(xml: &str) -> AppResult<(String, Vec<BodyParagraph>)> {
    let doc = roxmltree::Document::parse(xml)?;
    let body = doc
        .descendants()
        .find(|node| node.is_element() && node.tag_name().name() == "body")
        .ok_or_else(|| AppError::UnsupportedFormat(format!("{DOCUMENT_PART} has no body")))?;

    let prefix = body
        .tag_name()
        .namespace()
        .and_then(|ns| body.lookup_prefix(ns))
        .filter(|prefix| !prefix.is_empty())
        .unwrap_or("w")
        .to_string();

    let mut paragraphs = Vec::new();
    for node in body.children().filter(|n| is_element(n, "p")) {
        let properties_xml = node
            .children()
            .find(|child| is_element(child, "pPr"))
            .map(|ppr| xml[ppr.range()].to_string());

        let (runs, slots): (Vec<Run>, Vec<Option<HighlightSlot>>) = node
            .descendants()
            .filter(|n| is_element(n, "r"))
            .filter(|run| nearest_paragraph(run) == Some(node))
            .map(|run| (parse_run(run), highlight_slot(run)))
            .unzip();

        paragraphs.push(BodyParagraph {
            paragraph: Paragraph::with_properties(runs, properties_xml),
            span: node.range(),
            slots,
        });
    }

    Ok((prefix, paragraphs))
}

fn parse_run(run: roxmltree::Node<'_, '_>) -> Run {
    let mut text = String::new();
    for child in run.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "t" => {
                if let Some(value) = child.text() {
                    text.push_str(value);
                }
            }
            "tab" => text.push('\t'),
            "br" | "cr" => text.push('\n'),
            _ => {}
        }
    }

    let format = run
        .children()
        .find(|child| is_element(child, "rPr"))
        .map(parse_run_format)
        .unwrap_or_default();

    Run { text, format }
}

fn parse_run_format(rpr: roxmltree::Node<'_, '_>) -> RunFormat {
    let mut format = RunFormat::default();
    for prop in rpr.children().filter(|n| n.is_element()) {
        match prop.tag_name().name() {
            "rFonts" => {
                format.font = attr(prop, "ascii")
                    .or_else(|| attr(prop, "hAnsi"))
                    .map(ToString::to_string);
            }
            "sz" => format.size = attr(prop, "val").and_then(|raw| raw.parse().ok()),
            "b" => format.bold = toggle_on(prop),
            "i" => format.italic = toggle_on(prop),
            "highlight" => {
                format.highlight = attr(prop, "val")
                    .filter(|value| !value.eq_ignore_ascii_case("none"))
                    .map(ToString::to_string);
            }
            _ => {}
        }
    }
    format
}

fn highlight_slot(run: roxmltree::Node<'_, '_>) -> Option<HighlightSlot> {
    let Some(rpr) = run.children().find(|child| is_element(child, "rPr")) else {
        let first = run.children().find(|child| child.is_element())?;
        let at = first.range().start;
        return Some(HighlightSlot {
            range: at..at,
            wrap: true,
        });
    };

    if let Some(existing) = rpr.children().find(|child| is_element(child, "highlight")) {
        return Some(HighlightSlot {
            range: existing.range(),
            wrap: false,
        });
    }

    let Some(last) = rpr.children().filter(|child| child.is_element()).last() else {
        return Some(HighlightSlot {
            range: rpr.range(),
            wrap: true,
        });
    };

    let at = rpr
        .children()
        .filter(|child| child.is_element())
        .find(|child| AFTER_HIGHLIGHT.contains(&child.tag_name().name()))
        .map_or(last.range().end, |child| child.range().start);
    Some(HighlightSlot {
        range: at..at,
        wrap: false,
    })
}

fn is_element(node: &roxmltree::Node<'_, '_>, local_name: &str) -> bool {
    node.is_element() && node.tag_name().name() == local_name
}

fn nearest_paragraph<'a, 'input>(node: &roxmltree::Node<'a, 'input>) -> Option<roxmltree::Node<'a, 'input>> {
    node.ancestors().skip(1).find(|ancestor| is_element(ancestor, "p"))
}

fn attr<'a>(node: roxmltree::Node<'a, '_>, local_name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|attribute| attribute.name() == local_name)
        .map(|attribute| attribute.value())
}

/// `<w:b/>` is on; `<w:b w:val="0"/>` and friends are off.
fn toggle_on(node: roxmltree::Node<'_, '_>) -> bool {
    !matches!(
        attr(node, "val").map(str::to_ascii_lowercase).as_deref(),
        Some("0" | "false" | "off")
    )
}

fn render_paragraph(prefix: &str, paragraph: &Paragraph) -> String {
    let mut out = format!("<{prefix}:p>");
    if let Some(properties) = paragraph.properties_xml() {
        out.push_str(properties);
    }
    for run in paragraph.runs() {
        out.push_str(&render_run(prefix, run));
    }
    out.push_str(&format!("</{prefix}:p>"));
    out
}

fn render_run(prefix: &str, run: &Run) -> String {
    let mut out = format!("<{prefix}:r>");
    let props = render_run_format(prefix, &run.format);
    if !props.is_empty() {
        out.push_str(&format!("<{prefix}:rPr>{props}</{prefix}:rPr>"));
    }

    let mut pending = String::new();
    for ch in run.text.chars() {
        match ch {
            '\t' | '\n' => {
                flush_text(prefix, &mut pending, &mut out);
                let tag = if ch == '\t' { "tab" } else { "br" };
                out.push_str(&format!("<{prefix}:{tag}/>"));
            }
            _ => pending.push(ch),
        }
    }
    flush_text(prefix, &mut pending, &mut out);

    out.push_str(&format!("</{prefix}:r>"));
    out
}

fn flush_text(prefix: &str, pending: &mut String, out: &mut String) {
    if pending.is_empty() {
        return;
    }
    out.push_str(&format!(
        "<{prefix}:t xml:space=\"preserve\">{}</{prefix}:t>",
        escape_xml(pending)
    ));
    pending.clear();
}

// Element order follows CT_RPr: rFonts, b, i, sz, szCs, highlight.
fn render_run_format(prefix: &str, format: &RunFormat) -> String {
    let mut out = String::new();
    if let Some(font) = &format.font {
        let font = escape_xml(font);
        out.push_str(&format!(
            "<{prefix}:rFonts {prefix}:ascii=\"{font}\" {prefix}:hAnsi=\"{font}\" {prefix}:cs=\"{font}\"/>"
        ));
    }
    if format.bold {
        out.push_str(&format!("<{prefix}:b/>"));
    }
    if format.italic {
        out.push_str(&format!("<{prefix}:i/>"));
    }
    if let Some(size) = format.size {
        out.push_str(&format!(
            "<{prefix}:sz {prefix}:val=\"{size}\"/><{prefix}:szCs {prefix}:val=\"{size}\"/>"
        ));
    }
    if let Some(color) = &format.highlight {
        out.push_str(&render_highlight(prefix, color));
    }
    out
}

fn render_highlight(prefix: &str, color: &str) -> String {
    format!("<{prefix}:highlight {prefix}:val=\"{}\"/>", escape_xml(color))
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
