use crate::{
    analysis::{parse::parse_proofread_response, prompts::proofread_prompt},
    core::{
        errors::AppResult,
        types::{PageText, PhraseCorrection, ProofreadFinding},
    },
    providers::{ResponseFormat, TextModel},
};

/// Proofreads one page. A failed call becomes a single error row.
pub async fn proofread_page<M: TextModel>(
    model: &M,
    page: &PageText,
    glossary: &[String],
) -> Vec<ProofreadFinding> {
    if page.text.trim().is_empty() {
        return Vec::new();
    }

    match request_findings(model, page, glossary).await {
        Ok(findings) => findings,
        Err(err) => {
            tracing::warn!(
                page = page.page,
                code = err.code(),
                retryable = err.retryable(),
                error = %err,
                "proofreading call failed"
            );
            vec![ProofreadFinding::failed(page.page, &err)]
        }
    }
}

/// Proofreads every page in order; failures on one page never stop the rest.
pub async fn proofread_pages<M: TextModel>(
    model: &M,
    pages: &[PageText],
    glossary: &[String],
) -> Vec<ProofreadFinding> {
    let mut findings = Vec::new();
    for page in pages {
        let found = proofread_page(model, page, glossary).await;
        tracing::debug!(page = page.page, findings = found.len(), "page proofread");
        findings.extend(found);
    }
    findings
}

/// Corrections in discovery order, error rows excluded.
pub fn corrections_from(findings: &[ProofreadFinding]) -> Vec<PhraseCorrection> {
    findings
        .iter()
        .filter(|finding| !finding.is_failure())
        .map(PhraseCorrection::from)
        .collect()
}

async fn request_findings<M: TextModel>(
    model: &M,
    page: &PageText,
    glossary: &[String],
) -> AppResult<Vec<ProofreadFinding>> {
    let reply = model
        .generate(&proofread_prompt(&page.text, glossary), ResponseFormat::Text)
        .await?;
    parse_proofread_response(&reply, page.page)
}
