//! Parsers for the model's reply formats.
//!
//! A reply that carries neither a "nothing found" sentinel nor a single
//! parsable entry is reported as [`AppError::ProviderInvalidResponse`] instead
//! of an empty result.

use regex::{Regex, RegexBuilder};

use crate::{
    analysis::prompts::{NO_COHERENCE_ISSUES_SENTINEL, NO_ERRORS_SENTINEL},
    core::{
        errors::{AppError, AppResult},
        types::{CoherenceIssue, ProofreadFinding, RestructureRecommendation},
    },
};

/// Bumped whenever a reply format below changes shape.
pub const RESPONSE_FORMAT_VERSION: u32 = 1;

const PROOFREAD_PATTERN: &str =
    r"\[WRONG\]\s*(.*?)\s*->\s*\[CORRECT\]\s*(.*?)\s*->\s*\[SENTENCE\]\s*(.*?)\s*(?:\n|$)";
const COHERENCE_PATTERN: &str = r"\[MAIN TOPIC\]\s*(.*?)\s*->\s*\[ORIGINAL TEXT\]\s*(.*?)\s*->\s*\[SUGGESTED REVISION\]\s*(.*?)\s*(?:\n|$)";

pub fn parse_proofread_response(reply: &str, page: u32) -> AppResult<Vec<ProofreadFinding>> {
    let triples = parse_triples(reply, PROOFREAD_PATTERN, NO_ERRORS_SENTINEL, "proofreading")?;
    Ok(triples
        .into_iter()
        .map(|(wrong, correct, sentence)| ProofreadFinding {
            wrong,
            correct,
            sentence,
            page,
        })
        .collect())
}

pub fn parse_coherence_response(reply: &str) -> AppResult<Vec<CoherenceIssue>> {
    let triples = parse_triples(
        reply,
        COHERENCE_PATTERN,
        NO_COHERENCE_ISSUES_SENTINEL,
        "coherence",
    )?;
    Ok(triples
        .into_iter()
        .map(|(main_topic, original_text, suggested_revision)| CoherenceIssue {
            main_topic,
            original_text,
            suggested_revision,
        })
        .collect())
}

pub fn parse_restructure_response(reply: &str) -> AppResult<Vec<RestructureRecommendation>> {
    let body = strip_code_fence(reply);
    match serde_json::from_str::<Vec<RestructureRecommendation>>(body) {
        Ok(items) => Ok(items),
        Err(first_err) => {
            // Prose around the array: fall back to the outermost brackets.
            let embedded = match (body.find('['), body.rfind(']')) {
                (Some(start), Some(end)) if start < end => Some(&body[start..=end]),
                _ => None,
            };
            embedded
                .and_then(|slice| serde_json::from_str(slice).ok())
                .ok_or_else(|| {
                    AppError::ProviderInvalidResponse(format!(
                        "unparsable restructuring response (format v{RESPONSE_FORMAT_VERSION}): {first_err}"
                    ))
                })
        }
    }
}

/// Removes a surrounding fenced code block, language tag included.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn parse_triples(
    reply: &str,
    pattern: &str,
    sentinel: &str,
    kind: &str,
) -> AppResult<Vec<(String, String, String)>> {
    let matcher = compile(pattern)?;
    let triples: Vec<(String, String, String)> = matcher
        .captures_iter(reply)
        .map(|caps| {
            let field = |index: usize| {
                caps.get(index)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default()
            };
            (field(1), field(2), field(3))
        })
        .collect();

    if !triples.is_empty() {
        return Ok(triples);
    }
    if reply.to_uppercase().contains(sentinel) {
        return Ok(Vec::new());
    }
    Err(AppError::ProviderInvalidResponse(format!(
        "unparsable {kind} response (format v{RESPONSE_FORMAT_VERSION}): {}",
        preview(reply)
    )))
}

fn compile(pattern: &str) -> AppResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|err| AppError::Internal(format!("response pattern failed to compile: {err}")))
}

fn preview(reply: &str) -> String {
    const LIMIT: usize = 120;
    let trimmed = reply.trim();
    if trimmed.chars().count() <= LIMIT {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(LIMIT).collect();
    format!("{cut}\u{2026}")
}
