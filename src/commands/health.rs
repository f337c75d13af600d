use axum::{extract::State, Json};

use crate::{core::types::HealthResponse, providers::TextModel, AppState};

pub async fn health<M>(State(state): State<AppState<M>>) -> Json<HealthResponse>
where
    M: TextModel + Send + Sync + 'static,
{
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.model().model_name().to_string(),
    })
}
