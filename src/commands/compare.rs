use axum::{response::Response, Json};
use tracing::Instrument;

use crate::{
    commands::upload::{attachment, request_span, Upload, Uploads, DOCX_CONTENT_TYPE},
    core::{errors::AppResult, types::ComparisonRow},
    diff::report::{compare_paragraphs, render_report_docx},
    document::extract::extract_paragraphs,
};

pub async fn analyze(uploads: Uploads) -> AppResult<Json<Vec<ComparisonRow>>> {
    let (original, revised) = read_pair(uploads)?;
    let span = request_span("compare.analyze", &original);
    async move {
        let rows = compare_uploads(&original, &revised)?;
        Ok(Json(rows))
    }
    .instrument(span)
    .await
}

pub async fn download(uploads: Uploads) -> AppResult<Response> {
    let (original, revised) = read_pair(uploads)?;
    let span = request_span("compare.download", &original);
    async move {
        let rows = compare_uploads(&original, &revised)?;
        let report = render_report_docx(&rows)?;
        Ok(attachment(
            report,
            DOCX_CONTENT_TYPE,
            &format!("comparison_{}", original.filename),
        ))
    }
    .instrument(span)
    .await
}

pub fn compare_uploads(original: &Upload, revised: &Upload) -> AppResult<Vec<ComparisonRow>> {
    original.require_docx()?;
    revised.require_docx()?;
    let before = extract_paragraphs(&original.bytes)?;
    let after = extract_paragraphs(&revised.bytes)?;
    let rows = compare_paragraphs(&before, &after);
    tracing::info!(
        original_paragraphs = before.len(),
        revised_paragraphs = after.len(),
        rows = rows.len(),
        revised_file = %revised.filename,
        "comparison finished"
    );
    Ok(rows)
}

fn read_pair(mut uploads: Uploads) -> AppResult<(Upload, Upload)> {
    let original = uploads.take("file1")?;
    let revised = uploads.take("file2")?;
    Ok((original, revised))
}
