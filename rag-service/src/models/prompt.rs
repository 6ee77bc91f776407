//! The composite prompt sent to the generation backend.

use std::fmt;

pub const SYSTEM_LABEL: &str = "SYSTEM:";
pub const DATA_LABEL: &str = "RELEVANT DATA:";
pub const QUESTION_LABEL: &str = "QUESTION:";

/// Rendered in place of the data section when nothing matched.
pub const NO_DATA_MARKER: &str = "No relevant data found in the dataset.";

/// Three labeled sections in fixed order: directive, retrieved data, question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositePrompt {
    pub directive: String,
    /// Rendered match set, or [`NO_DATA_MARKER`]. Never empty.
    pub data: String,
    /// The caller's query, verbatim.
    pub question: String,
}

impl CompositePrompt {
    /// Render the single text payload for the backend.
    pub fn render(&self) -> String {
        format!(
            "{SYSTEM_LABEL}\n{}\n\n{DATA_LABEL}\n{}\n\n{QUESTION_LABEL}\n{}",
            self.directive, self.data, self.question
        )
    }

    /// Split a rendered payload back into its sections.
    ///
    /// The directive ends at the first data label and the data section at the
    /// first question label after it, so anything the caller wrote in the
    /// question (including label text) lands in `question` untouched.
    ///
    /// A directive or data section that itself contains a label line does not
    /// round-trip: the split happens at the embedded label. See
    /// [`contains_section_label`].
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.strip_prefix(SYSTEM_LABEL)?.strip_prefix('\n')?;

        let data_sep = format!("\n\n{DATA_LABEL}\n");
        let (directive, rest) = rest.split_once(data_sep.as_str())?;

        let question_sep = format!("\n\n{QUESTION_LABEL}\n");
        let (data, question) = rest.split_once(question_sep.as_str())?;

        Some(Self {
            directive: directive.to_string(),
            data: data.to_string(),
            question: question.to_string(),
        })
    }
}

/// Whether `text` has a line that reads as a section label. Such text cannot
/// sit in the directive or data section without confusing [`CompositePrompt::parse`].
pub fn contains_section_label(text: &str) -> bool {
    text.lines()
        .any(|line| matches!(line.trim_end(), SYSTEM_LABEL | DATA_LABEL | QUESTION_LABEL))
}

impl fmt::Display for CompositePrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
