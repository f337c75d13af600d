use crate::diff::matcher::{opcodes, OpTag};

/// Reported when two paragraphs differ only by deletions or whitespace.
pub const MINOR_CHANGE: &str = "Minor Change";

/// Words added or replaced in `revised` relative to `original`.
///
/// Each inserted or replaced span is space-joined and spans are separated by
/// `", "`. Words that were only deleted are not reported.
pub fn changed_words(original: &str, revised: &str) -> String {
    let before: Vec<&str> = original.split_whitespace().collect();
    let after: Vec<&str> = revised.split_whitespace().collect();

    let spans: Vec<String> = opcodes(&before, &after)
        .into_iter()
        .filter(|op| matches!(op.tag, OpTag::Insert | OpTag::Replace))
        .map(|op| after[op.j1..op.j2].join(" "))
        .filter(|span| !span.is_empty())
        .collect();

    if spans.is_empty() {
        MINOR_CHANGE.to_string()
    } else {
        spans.join(", ")
    }
}
