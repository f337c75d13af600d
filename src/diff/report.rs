use std::io::Cursor;

use docx_rs::{
    Docx, Paragraph, Run, Table, TableBorder, TableBorderPosition, TableBorders, TableCell, TableRow,
};

use crate::{
    core::{
        errors::{AppError, AppResult},
        types::ComparisonRow,
    },
    diff::{
        matcher::{opcodes, OpTag},
        words::changed_words,
    },
};

pub const REPORT_TITLE: &str = "Document Comparison Result";
pub const REPORT_COLUMNS: [&str; 3] = ["Original Sentence", "Revised Sentence", "Revised Words"];

// twentieths of a point; three columns fill an A4 text block
const COLUMN_WIDTH: usize = 3200;
// eighths of a point, as Word's "Table Grid" style
const GRID_BORDER_SIZE: usize = 4;

/// One row per paired paragraph inside each `replace` span.
///
/// Originals are paired positionally with revised paragraphs of the same
/// span; when the original side is longer, the surplus originals produce no
/// row. Equal, inserted and deleted paragraphs are never reported.
pub fn compare_paragraphs(original: &[String], revised: &[String]) -> Vec<ComparisonRow> {
    let mut rows = Vec::new();
    for op in opcodes(original, revised) {
        if op.tag != OpTag::Replace {
            continue;
        }
        for i in op.i1..op.i2 {
            let j = op.j1 + (i - op.i1);
            if j >= op.j2 {
                continue;
            }
            rows.push(ComparisonRow {
                original: original[i].clone(),
                revised: revised[j].clone(),
                changed_words: changed_words(&original[i], &revised[j]),
            });
        }
    }
    rows
}

/// Renders the comparison as a DOCX: title, blank line, then a bordered grid
/// table with a header row and one row per entry.
pub fn render_report_docx(rows: &[ComparisonRow]) -> AppResult<Vec<u8>> {
    if rows.is_empty() {
        return Err(AppError::NothingToExport(
            "there are no differences to download".to_string(),
        ));
    }

    let header = TableRow::new(
        REPORT_COLUMNS
            .iter()
            .map(|name| text_cell(name, true))
            .collect(),
    );
    let mut table_rows = vec![header];
    for row in rows {
        table_rows.push(TableRow::new(vec![
            text_cell(&row.original, false),
            text_cell(&row.revised, false),
            text_cell(&row.changed_words, false),
        ]));
    }

    let docx = Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(REPORT_TITLE).bold().size(28)))
        .add_paragraph(Paragraph::new())
        .add_table(
            Table::new(table_rows)
                .set_grid(vec![COLUMN_WIDTH; REPORT_COLUMNS.len()])
                .set_borders(grid_borders()),
        );

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|err| AppError::Document(format!("failed to write comparison report: {err}")))?;
    tracing::debug!(rows = rows.len(), "comparison report rendered");
    Ok(buffer.into_inner())
}

fn grid_borders() -> TableBorders {
    [
        TableBorderPosition::Top,
        TableBorderPosition::Left,
        TableBorderPosition::Bottom,
        TableBorderPosition::Right,
        TableBorderPosition::InsideH,
        TableBorderPosition::InsideV,
    ]
    .into_iter()
    .fold(TableBorders::new(), |borders, position| {
        borders.set(TableBorder::new(position).size(GRID_BORDER_SIZE))
    })
}

fn text_cell(text: &str, bold: bool) -> TableCell {
    let run = Run::new().add_text(text);
    let run = if bold { run.bold() } else { run };
    TableCell::new().add_paragraph(Paragraph::new().add_run(run))
}
