use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::errors::{AppError, AppResult};

/// Marker placed in the first field of a synthetic row that stands in for a
/// failed model call.
pub const FAILURE_MARKER: &str = "ERROR";
pub const FAILURE_NOTE: &str = "Failed to reach the model API";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Format tag from the extension after the last `.` of an upload name.
    pub fn from_filename(filename: &str) -> AppResult<Self> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.trim().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            _ => Err(AppError::UnsupportedFormat(
                "please upload a .pdf or .docx file".to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageText {
    pub page: u32,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProofreadFinding {
    pub wrong: String,
    pub correct: String,
    pub sentence: String,
    pub page: u32,
}

impl ProofreadFinding {
    pub fn failed(page: u32, err: &AppError) -> Self {
        Self {
            wrong: FAILURE_MARKER.to_string(),
            correct: err.to_string(),
            sentence: FAILURE_NOTE.to_string(),
            page,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.wrong == FAILURE_MARKER && self.sentence == FAILURE_NOTE
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoherenceIssue {
    pub main_topic: String,
    pub original_text: String,
    pub suggested_revision: String,
}

impl CoherenceIssue {
    pub fn failed(err: &AppError) -> Self {
        Self {
            main_topic: FAILURE_MARKER.to_string(),
            original_text: err.to_string(),
            suggested_revision: FAILURE_NOTE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RestructureRecommendation {
    /// Full text of the paragraph that belongs elsewhere.
    #[serde(default)]
    pub misplaced_paragraph: String,
    /// Section the paragraph currently sits in.
    #[serde(default)]
    pub original_section: String,
    /// Section the paragraph should move to.
    #[serde(default)]
    pub recommended_section: String,
}

impl RestructureRecommendation {
    pub fn failed(err: &AppError) -> Self {
        Self {
            misplaced_paragraph: FAILURE_MARKER.to_string(),
            original_section: err.to_string(),
            recommended_section: FAILURE_NOTE.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.misplaced_paragraph == FAILURE_MARKER && self.recommended_section == FAILURE_NOTE
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComparisonRow {
    pub original: String,
    pub revised: String,
    pub changed_words: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhraseCorrection {
    pub wrong: String,
    pub correct: String,
}

impl PhraseCorrection {
    pub fn new(wrong: impl Into<String>, correct: impl Into<String>) -> Self {
        Self {
            wrong: wrong.into(),
            correct: correct.into(),
        }
    }
}

impl From<&ProofreadFinding> for PhraseCorrection {
    fn from(value: &ProofreadFinding) -> Self {
        Self::new(value.wrong.clone(), value.correct.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}
