use axum::{
    extract::State,
    Json,
};
use tracing::Instrument;

use crate::{
    analysis::coherence::analyze_coherence,
    commands::upload::{request_span, Uploads},
    core::{errors::AppResult, types::CoherenceIssue},
    document::extract::{extract_pages, full_text},
    providers::TextModel,
    AppState,
};

pub async fn analyze<M>(
    State(state): State<AppState<M>>,
    mut uploads: Uploads,
) -> AppResult<Json<Vec<CoherenceIssue>>>
where
    M: TextModel + Send + Sync + 'static,
{
    let upload = uploads.take("file")?;
    let span = request_span("coherence.analyze", &upload);
    async move {
        let pages = extract_pages(&upload.bytes, upload.format()?)?;
        let issues = analyze_coherence(state.model(), &full_text(&pages)).await;
        tracing::info!(issues = issues.len(), "coherence analysis finished");
        Ok(Json(issues))
    }
    .instrument(span)
    .await
}
