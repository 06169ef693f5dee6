use serde::{Deserialize, Serialize};

/// Labels a block may tag its options with, in display order.
pub const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// One multiple choice question as persisted and played.
///
/// The serde field names are the storage wire format and must not change.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionRecord {
    #[serde(rename = "question")]
    pub question_text: String,
    pub options: Vec<String>,
    // Either an option label ("B") or the literal text of the correct option.
    #[serde(rename = "correctAnswerIndex")]
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
    // Empty when the options carry the positional labels A, B, C...
    #[serde(
        rename = "optionLabels",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub option_labels: Vec<char>,
}

impl QuestionRecord {
    pub fn new(
        question_text: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        QuestionRecord {
            question_text: question_text.into(),
            options,
            correct_answer: correct_answer.into(),
            explanation: explanation.into(),
            option_labels: Vec::new(),
        }
    }

    /// Attach explicit labels. Positional labels are normalised away so that
    /// records without gaps serialise exactly as the plain wire format.
    pub fn with_labels(mut self, labels: Vec<char>) -> Self {
        let positional = labels.len() == self.options.len()
            && labels.iter().zip(OPTION_LABELS.iter()).all(|(a, b)| a == b);
        self.option_labels = if positional { Vec::new() } else { labels };
        self
    }

    pub fn option_label(&self, index: usize) -> Option<char> {
        if index >= self.options.len() {
            return None;
        }
        match self.option_labels.get(index) {
            Some(label) => Some(*label),
            None => char::from_u32('A' as u32 + index as u32),
        }
    }

    /// Text of the correct option. A literal text match wins over a label
    /// match. An answer whose text appears on more than one option resolves
    /// to nothing.
    pub fn resolve_correct_answer(&self) -> Option<&str> {
        self.correct_index().map(|i| self.options[i].as_str())
    }

    pub fn correct_index(&self) -> Option<usize> {
        let wanted = self.correct_answer.trim();
        if wanted.is_empty() {
            return None;
        }

        let index = match self.options.iter().position(|o| o.trim() == wanted) {
            Some(index) => index,
            None => {
                let label = parse_label(wanted)?;
                (0..self.options.len()).find(|i| self.option_label(*i) == Some(label))?
            }
        };

        let text = self.options[index].trim();
        let duplicates = self.options.iter().filter(|o| o.trim() == text).count();
        (duplicates == 1).then_some(index)
    }

    pub fn is_complete(&self) -> bool {
        !self.question_text.trim().is_empty()
            && !self.options.is_empty()
            && self.resolve_correct_answer().is_some()
    }

    pub fn is_correct(&self, selected: &str) -> bool {
        self.resolve_correct_answer()
            .is_some_and(|correct| correct == selected)
    }
}

// Accepts "B", "b", "B)" and "B." as a reference to label B.
fn parse_label(raw: &str) -> Option<char> {
    let trimmed = raw.trim_end_matches([')', '.', ':']).trim();
    let mut chars = trimmed.chars();
    let first = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() || !first.is_ascii_uppercase() {
        return None;
    }
    Some(first)
}
