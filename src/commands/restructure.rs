use axum::{
    extract::State,
    response::Response,
    Json,
};
use tracing::Instrument;

use crate::{
    analysis::restructure::{misplaced_paragraphs, recommend_structure},
    commands::upload::{attachment, request_span, Uploads, DOCX_CONTENT_TYPE},
    core::{
        errors::{AppError, AppResult},
        types::RestructureRecommendation,
    },
    document::{
        apply::highlight_paragraphs,
        extract::{extract_pages, full_text},
        package::DocxPackage,
    },
    providers::TextModel,
    AppState,
};

pub async fn analyze<M>(
    State(state): State<AppState<M>>,
    mut uploads: Uploads,
) -> AppResult<Json<Vec<RestructureRecommendation>>>
where
    M: TextModel + Send + Sync + 'static,
{
    let upload = uploads.take("file")?;
    let span = request_span("restructure.analyze", &upload);
    async move {
        let pages = extract_pages(&upload.bytes, upload.format()?)?;
        let recommendations = recommend_structure(state.model(), &full_text(&pages)).await;
        tracing::info!(recommendations = recommendations.len(), "restructuring analysis finished");
        Ok(Json(recommendations))
    }
    .instrument(span)
    .await
}

pub async fn download<M>(
    State(state): State<AppState<M>>,
    mut uploads: Uploads,
) -> AppResult<Response>
where
    M: TextModel + Send + Sync + 'static,
{
    let upload = uploads.take("file")?;
    let span = request_span("restructure.download", &upload);
    async move {
        upload.require_docx()?;
        let mut package = DocxPackage::open(&upload.bytes)?;
        let pages = extract_pages(&upload.bytes, upload.format()?)?;

        let recommendations = recommend_structure(state.model(), &full_text(&pages)).await;
        let targets = misplaced_paragraphs(&recommendations);
        if targets.is_empty() {
            return Err(AppError::NothingToExport(
                "there are no recommendations to download".to_string(),
            ));
        }

        let highlighted = highlight_paragraphs(package.paragraphs_mut(), &targets);
        tracing::info!(
            recommendations = recommendations.len(),
            highlighted,
            "recommendation highlights generated"
        );
        Ok(attachment(
            package.save()?,
            DOCX_CONTENT_TYPE,
            &format!("highlighted_recommendations_{}", upload.filename),
        ))
    }
    .instrument(span)
    .await
}
