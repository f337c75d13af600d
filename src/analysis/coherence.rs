use crate::{
    analysis::{parse::parse_coherence_response, prompts::coherence_prompt},
    core::types::CoherenceIssue,
    providers::{ResponseFormat, TextModel},
};

pub async fn analyze_coherence<M: TextModel>(model: &M, full_text: &str) -> Vec<CoherenceIssue> {
    if full_text.trim().is_empty() {
        return Vec::new();
    }

    let outcome = match model
        .generate(&coherence_prompt(full_text), ResponseFormat::Text)
        .await
    {
        Ok(reply) => parse_coherence_response(&reply),
        Err(err) => Err(err),
    };

    outcome.unwrap_or_else(|err| {
        tracing::warn!(code = err.code(), retryable = err.retryable(), error = %err, "coherence call failed");
        vec![CoherenceIssue::failed(&err)]
    })
}
