use crate::{
    analysis::{parse::parse_restructure_response, prompts::restructure_prompt},
    core::types::RestructureRecommendation,
    providers::{ResponseFormat, TextModel},
};

pub async fn recommend_structure<M: TextModel>(
    model: &M,
    full_text: &str,
) -> Vec<RestructureRecommendation> {
    if full_text.trim().is_empty() {
        return Vec::new();
    }

    let outcome = match model
        .generate(&restructure_prompt(full_text), ResponseFormat::Json)
        .await
    {
        Ok(reply) => parse_restructure_response(&reply),
        Err(err) => Err(err),
    };

    outcome.unwrap_or_else(|err| {
        tracing::warn!(code = err.code(), retryable = err.retryable(), error = %err, "restructuring call failed");
        vec![RestructureRecommendation::failed(&err)]
    })
}

/// Misplaced paragraphs worth highlighting, error rows excluded.
pub fn misplaced_paragraphs(recommendations: &[RestructureRecommendation]) -> Vec<String> {
    recommendations
        .iter()
        .filter(|rec| !rec.is_failure())
        .map(|rec| rec.misplaced_paragraph.clone())
        .filter(|paragraph| !paragraph.trim().is_empty())
        .collect()
}
