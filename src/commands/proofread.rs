use axum::{
    extract::State,
    response::Response,
    Json,
};
use tracing::Instrument;

use crate::{
    analysis::proofread::{corrections_from, proofread_pages},
    commands::upload::{attachment, request_span, Upload, Uploads, DOCX_CONTENT_TYPE, ZIP_CONTENT_TYPE},
    core::{errors::AppResult, types::ProofreadFinding},
    document::{
        apply::{apply_corrections, highlight_phrases},
        bundle::{bundle_name, bundle_revisions, highlighted_name, revised_name},
        extract::extract_pages,
        package::DocxPackage,
    },
    providers::TextModel,
    AppState,
};

pub async fn analyze<M>(
    State(state): State<AppState<M>>,
    mut uploads: Uploads,
) -> AppResult<Json<Vec<ProofreadFinding>>>
where
    M: TextModel + Send + Sync + 'static,
{
    let upload = uploads.take("file")?;
    let span = request_span("proofread.analyze", &upload);
    async move {
        let pages = extract_pages(&upload.bytes, upload.format()?)?;
        let findings = proofread_pages(state.model(), &pages, &state.config().glossary).await;
        tracing::info!(pages = pages.len(), findings = findings.len(), "proofreading finished");
        Ok(Json(findings))
    }
    .instrument(span)
    .await
}

pub async fn download_revised<M>(
    State(state): State<AppState<M>>,
    mut uploads: Uploads,
) -> AppResult<Response>
where
    M: TextModel + Send + Sync + 'static,
{
    let upload = uploads.take("file")?;
    let span = request_span("proofread.download_revised", &upload);
    async move {
        let revisions = build_revisions(&state, &upload).await?;
        Ok(attachment(
            revisions.revised,
            DOCX_CONTENT_TYPE,
            &revised_name(&upload.filename),
        ))
    }
    .instrument(span)
    .await
}

pub async fn download_highlighted<M>(
    State(state): State<AppState<M>>,
    mut uploads: Uploads,
) -> AppResult<Response>
where
    M: TextModel + Send + Sync + 'static,
{
    let upload = uploads.take("file")?;
    let span = request_span("proofread.download_highlighted", &upload);
    async move {
        let revisions = build_revisions(&state, &upload).await?;
        Ok(attachment(
            revisions.highlighted,
            DOCX_CONTENT_TYPE,
            &highlighted_name(&upload.filename),
        ))
    }
    .instrument(span)
    .await
}

pub async fn download_bundle<M>(
    State(state): State<AppState<M>>,
    mut uploads: Uploads,
) -> AppResult<Response>
where
    M: TextModel + Send + Sync + 'static,
{
    let upload = uploads.take("file")?;
    let span = request_span("proofread.download_bundle", &upload);
    async move {
        let revisions = build_revisions(&state, &upload).await?;
        let archive = bundle_revisions(&revisions.revised, &revisions.highlighted, &upload.filename)?;
        Ok(attachment(archive, ZIP_CONTENT_TYPE, &bundle_name(&upload.filename)))
    }
    .instrument(span)
    .await
}

pub struct Revisions {
    pub revised: Vec<u8>,
    pub highlighted: Vec<u8>,
}

/// Proofreads a DOCX and renders both the corrected and the highlighted copy.
pub async fn build_revisions<M: TextModel>(state: &AppState<M>, upload: &Upload) -> AppResult<Revisions> {
    upload.require_docx()?;
    let package = DocxPackage::open(&upload.bytes)?;
    let pages = extract_pages(&upload.bytes, upload.format()?)?;

    let findings = proofread_pages(state.model(), &pages, &state.config().glossary).await;
    let corrections = corrections_from(&findings);
    let phrases: Vec<&str> = corrections.iter().map(|c| c.wrong.as_str()).collect();

    let mut revised = package.clone();
    let rewrites = apply_corrections(revised.paragraphs_mut(), &corrections);

    let mut highlighted = package;
    let rebuilt = highlight_phrases(highlighted.paragraphs_mut(), &phrases)?;

    tracing::info!(
        findings = findings.len(),
        corrections = corrections.len(),
        rewrites,
        rebuilt,
        "revisions generated"
    );

    Ok(Revisions {
        revised: revised.save()?,
        highlighted: highlighted.save()?,
    })
}
