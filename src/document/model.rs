/// Highlight colour applied to flagged text.
pub const HIGHLIGHT_YELLOW: &str = "yellow";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunFormat {
    pub font: Option<String>,
    /// Font size in half-points, as stored in `w:sz`.
    pub size: Option<u32>,
    pub bold: bool,
    pub italic: bool,
    pub highlight: Option<String>,
}

impl RunFormat {
    /// Font family and size only; emphasis and highlight are dropped.
    pub fn base(&self) -> Self {
        Self {
            font: self.font.clone(),
            size: self.size,
            ..Self::default()
        }
    }

    pub fn highlighted(mut self, color: &str) -> Self {
        self.highlight = Some(color.to_string());
        self
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlight.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub format: RunFormat,
}

impl Run {
    pub fn new(text: impl Into<String>, format: RunFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }
}

/// How far an applier has changed a paragraph since it was read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Edit {
    #[default]
    Clean,
    /// Same runs and text; only run highlights changed.
    Restyled,
    /// Runs were replaced.
    Rewritten,
}

/// A body paragraph. Its text is always the concatenation of its runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    runs: Vec<Run>,
    properties_xml: Option<String>,
    edit: Edit,
}

impl Paragraph {
    pub fn new(runs: Vec<Run>) -> Self {
        Self {
            runs,
            properties_xml: None,
            edit: Edit::Clean,
        }
    }

    pub(crate) fn with_properties(runs: Vec<Run>, properties_xml: Option<String>) -> Self {
        Self {
            runs,
            properties_xml,
            edit: Edit::Clean,
        }
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn properties_xml(&self) -> Option<&str> {
        self.properties_xml.as_deref()
    }

    /// True once an applier has changed the paragraph.
    pub fn is_dirty(&self) -> bool {
        self.edit != Edit::Clean
    }

    pub fn edit(&self) -> Edit {
        self.edit
    }

    pub fn base_format(&self) -> RunFormat {
        self.runs
            .first()
            .map(|run| run.format.base())
            .unwrap_or_default()
    }

    /// Collapses the paragraph into one run carrying `text`.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let format = self.base_format();
        self.replace_runs(vec![Run::new(text, format)]);
    }

    pub fn replace_runs(&mut self, runs: Vec<Run>) {
        self.runs = runs;
        self.edit = Edit::Rewritten;
    }

    pub fn highlight_all(&mut self, color: &str) {
        for run in &mut self.runs {
            run.format.highlight = Some(color.to_string());
        }
        if self.edit == Edit::Clean {
            self.edit = Edit::Restyled;
        }
    }
}
