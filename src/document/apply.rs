//! In-place document mutations driven by model findings.
//!
//! Rewritten paragraphs lose their run-level styling; only the font family and
//! size of the first run are carried over.

use std::collections::{BTreeMap, HashSet};

use regex::RegexBuilder;

use crate::{
    core::{
        errors::{AppError, AppResult},
        types::PhraseCorrection,
    },
    document::model::{Paragraph, Run, HIGHLIGHT_YELLOW},
};

/// Rewrites every paragraph containing a wrong phrase.
///
/// Corrections are applied in reverse of the order they were found, each one
/// replacing all literal occurrences across all paragraphs. Returns the number
/// of paragraph rewrites performed.
pub fn apply_corrections(paragraphs: &mut [Paragraph], corrections: &[PhraseCorrection]) -> usize {
    let mut rewrites = 0;
    for correction in corrections.iter().rev() {
        if correction.wrong.is_empty() {
            continue;
        }
        for paragraph in paragraphs.iter_mut() {
            let text = paragraph.text();
            if text.contains(&correction.wrong) {
                paragraph.set_text(text.replace(&correction.wrong, &correction.correct));
                rewrites += 1;
            }
        }
    }
    tracing::debug!(corrections = corrections.len(), rewrites, "corrections applied");
    rewrites
}

/// Splits paragraphs around case-insensitive phrase occurrences and
/// highlights the matching fragments. Returns the number of rebuilt paragraphs.
pub fn highlight_phrases<S: AsRef<str>>(paragraphs: &mut [Paragraph], phrases: &[S]) -> AppResult<usize> {
    // lowercase form -> phrase as first seen
    let mut unique: BTreeMap<String, &str> = BTreeMap::new();
    for phrase in phrases {
        let phrase = phrase.as_ref();
        if phrase.is_empty() {
            continue;
        }
        unique.entry(phrase.to_lowercase()).or_insert(phrase);
    }
    if unique.is_empty() {
        return Ok(0);
    }

    let mut ordered: Vec<&str> = unique.values().copied().collect();
    ordered.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
    let pattern = ordered
        .iter()
        .map(|phrase| regex::escape(phrase))
        .collect::<Vec<_>>()
        .join("|");
    let matcher = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|err| AppError::Internal(format!("highlight pattern failed to compile: {err}")))?;

    let mut rebuilt = 0;
    for paragraph in paragraphs.iter_mut() {
        let text = paragraph.text();
        if !matcher.is_match(&text) {
            continue;
        }

        let mut fragments: Vec<&str> = Vec::new();
        let mut last = 0;
        for found in matcher.find_iter(&text) {
            fragments.push(&text[last..found.start()]);
            fragments.push(found.as_str());
            last = found.end();
        }
        fragments.push(&text[last..]);

        let base = paragraph.base_format();
        let runs = fragments
            .into_iter()
            .filter(|fragment| !fragment.is_empty())
            .map(|fragment| {
                if unique.contains_key(&fragment.to_lowercase()) {
                    Run::new(fragment, base.clone().highlighted(HIGHLIGHT_YELLOW))
                } else {
                    Run::new(fragment, base.clone())
                }
            })
            .collect();
        paragraph.replace_runs(runs);
        rebuilt += 1;
    }
    tracing::debug!(phrases = unique.len(), rebuilt, "phrases highlighted");
    Ok(rebuilt)
}

/// Highlights every run of the paragraphs whose trimmed text equals one of
/// the trimmed `targets`. Run boundaries and all other run formatting are
/// kept. Returns the number of highlighted paragraphs.
pub fn highlight_paragraphs<S: AsRef<str>>(paragraphs: &mut [Paragraph], targets: &[S]) -> usize {
    let wanted: HashSet<&str> = targets
        .iter()
        .map(|target| target.as_ref().trim())
        .filter(|target| !target.is_empty())
        .collect();
    if wanted.is_empty() {
        return 0;
    }

    let mut highlighted = 0;
    for paragraph in paragraphs.iter_mut() {
        if wanted.contains(paragraph.text().trim()) {
            paragraph.highlight_all(HIGHLIGHT_YELLOW);
            highlighted += 1;
        }
    }
    highlighted
}
