use crate::core::types::RestructureRecommendation;

pub const NO_ERRORS_SENTINEL: &str = "NO ERRORS";
pub const NO_COHERENCE_ISSUES_SENTINEL: &str = "NO COHERENCE ISSUES";

pub fn proofread_prompt(text: &str, glossary: &[String]) -> String {
    let mut prompt = String::new();
    prompt.push_str("You are a meticulous auditor and language expert. Proofread the text below.\n");
    prompt.push_str("Focus on:\n");
    prompt.push_str("1. Typos and spelling that do not follow the official dictionary and spelling guide.\n");
    prompt.push_str("2. Flag only the wrong words or phrases and correct only those, never the whole sentence.\n");
    prompt.push_str("3. Leave italicised words and formatting as they are.\n");
    prompt.push_str("4. Once an acronym has been introduced, later occurrences may use the acronym alone.\n");
    prompt.push_str("5. Skip letter numbers and closing sections.\n");
    prompt.push_str("6. English terms that fit the sentence do not need to be translated.\n");
    prompt.push_str("7. Every sentence starts with a capital letter; items following a `;` do not.\n");
    prompt.push_str("8. Check punctuation (commas, semicolons, full stops, hyphens); every sentence ends with a full stop.\n");
    if !glossary.is_empty() {
        prompt.push_str("9. These names and terms are correct as written, do not flag them: ");
        prompt.push_str(&glossary.join(", "));
        prompt.push('\n');
    }
    prompt.push_str("\nIMPORTANT: use this exact format for every error, one per line:\n");
    prompt.push_str("[WRONG] wrong word or phrase -> [CORRECT] corrected word or phrase -> [SENTENCE] the full original sentence\n\n");
    prompt.push_str("Example:\n");
    prompt.push_str("[WRONG] recieve -> [CORRECT] receive -> [SENTENCE] We did not recieve the report.\n\n");
    prompt.push_str(&format!(
        "If there are no errors at all, reply with exactly: \"{NO_ERRORS_SENTINEL}\"\n\n"
    ));
    prompt.push_str("Text to check:\n---\n");
    prompt.push_str(text);
    prompt.push('\n');
    prompt
}

pub fn coherence_prompt(text: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str("You are an expert auditor analysing the structure and coherence of a document.\n");
    prompt.push_str("Read the whole text and find every sentence or paragraph that is incoherent or drifts away from the main topic of its section.\n");
    prompt.push_str("For each one:\n");
    prompt.push_str("1. Read the section or subsection heading.\n");
    prompt.push_str("2. Determine the main topic of the section from its paragraphs.\n");
    prompt.push_str("3. Identify the original sentence that deviates from that topic.\n");
    prompt.push_str("4. Suggest a reworded sentence that fits the topic while keeping the original intent.\n");
    prompt.push_str("5. Leave English terms untranslated; fix non-standard words.\n\n");
    prompt.push_str("Use this exact format, one line per finding:\n");
    prompt.push_str("[MAIN TOPIC] main topic of the section -> [ORIGINAL TEXT] the incoherent sentence -> [SUGGESTED REVISION] the revised sentence\n\n");
    prompt.push_str(&format!(
        "If the whole document is coherent, reply with exactly: \"{NO_COHERENCE_ISSUES_SENTINEL}\"\n\n"
    ));
    prompt.push_str("Text:\n---\n");
    prompt.push_str(text);
    prompt.push('\n');
    prompt
}

pub fn restructure_prompt(text: &str) -> String {
    let schema = schemars::schema_for!(Vec<RestructureRecommendation>);
    let schema_json = serde_json::to_string_pretty(&schema).unwrap_or_default();

    let mut prompt = String::new();
    prompt.push_str("You are an expert auditor reviewing how a document is organised.\n");
    prompt.push_str("Find paragraphs that sit in the wrong section and recommend the section they belong to.\n\n");
    prompt.push_str("Reply with a JSON list. Every object has three keys: \"misplaced_paragraph\", \"original_section\" and \"recommended_section\".\n");
    if !schema_json.is_empty() {
        prompt.push_str("The reply must validate against this JSON schema:\n");
        prompt.push_str(&schema_json);
        prompt.push('\n');
    }
    prompt.push_str("\nExample:\n");
    prompt.push_str("[\n  {\n    \"misplaced_paragraph\": \"Internal audit also reviews the quarterly financial statements...\",\n    \"original_section\": \"Chapter 2.1: Whistleblowing Procedure\",\n    \"recommended_section\": \"Chapter 4.2: Role of Internal Audit\"\n  }\n]\n");
    prompt.push_str("If the document is already well organised, reply with an empty list: []\n\n");
    prompt.push_str("Document text:\n---\n");
    prompt.push_str(text);
    prompt.push('\n');
    prompt
}
