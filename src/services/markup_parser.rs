//! Reader for the tagged question markup returned by the text generator.
//!
//! A response holds one or more blocks separated by `"\n[.]"`. Inside a block
//! each line contributes at most one field:
//!
//! | tag        | field                          |
//! |------------|--------------------------------|
//! | `[*]:`     | question text (trimmed)        |
//! | `[A]:`-`[D]:` | option with that label (trimmed) |
//! | `[_]:`     | correct answer (verbatim)      |
//! | `[;]:`     | explanation (verbatim)         |
//!
//! Untagged lines are ignored and a repeated tag overwrites the earlier value.
//! Blocks that do not add up to a complete question are dropped; parsing
//! never fails.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::domain::{question_record::OPTION_LABELS, QuestionRecord};

pub const BLOCK_SEPARATOR: &str = "\n[.]";

const QUESTION_TAG: &str = "[*]:";
const ANSWER_TAG: &str = "[_]:";
const EXPLANATION_TAG: &str = "[;]:";

static OPTION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([ABCD])\]:(.*)$").expect("OPTION_LINE is a valid regex pattern")
});

#[derive(Default)]
struct BlockFields {
    question: Option<String>,
    options: [Option<String>; 4],
    correct_answer: Option<String>,
    explanation: Option<String>,
}

impl BlockFields {
    fn read_line(&mut self, line: &str) {
        if let Some(rest) = line.strip_prefix(QUESTION_TAG) {
            self.question = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix(ANSWER_TAG) {
            self.correct_answer = Some(rest.to_string());
        } else if let Some(rest) = line.strip_prefix(EXPLANATION_TAG) {
            self.explanation = Some(rest.to_string());
        } else if let Some(caps) = OPTION_LINE.captures(line) {
            let label = caps[1].chars().next();
            if let Some(slot) = OPTION_LABELS.iter().position(|l| Some(*l) == label) {
                self.options[slot] = Some(caps[2].trim().to_string());
            }
        }
    }

    fn into_record(self) -> Option<QuestionRecord> {
        let mut labels = Vec::new();
        let mut options = Vec::new();
        for (label, option) in OPTION_LABELS.iter().zip(self.options) {
            if let Some(text) = option {
                labels.push(*label);
                options.push(text);
            }
        }

        let record = QuestionRecord::new(
            self.question?,
            options,
            self.correct_answer?,
            self.explanation.unwrap_or_default(),
        )
        .with_labels(labels);

        record.is_complete().then_some(record)
    }
}

fn parse_block(block: &str) -> Option<QuestionRecord> {
    let mut fields = BlockFields::default();
    for line in block.lines() {
        fields.read_line(line);
    }
    fields.into_record()
}

/// Extract every complete question from a generator response.
pub fn parse(text: &str) -> Vec<QuestionRecord> {
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for block in text
        .split(BLOCK_SEPARATOR)
        .map(str::trim)
        .filter(|b| !b.is_empty())
    {
        match parse_block(block) {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!(
            "Dropped {} incomplete question block(s), kept {}",
            dropped,
            records.len()
        );
    }
    records
}
