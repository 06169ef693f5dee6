use crate::models::domain::QuestionRecord;

#[cfg(test)]
pub mod fixtures {
    use super::*;

    pub const ARITHMETIC_BLOCK: &str =
        "[*]:1+1=?\n[A]:1\n[B]:2\n[C]:3\n[D]:4\n[_]:2\n[;]:1+1=2";

    pub const GEOGRAPHY_BLOCK: &str = "[*]:Capital of France?\n[A]:Berlin\n[B]:Paris\n[C]:Rome\n[D]:Madrid\n[_]:B\n[;]:Paris has been the capital for centuries.";

    /// Only two lettered options, with a gap at B.
    pub const PLANETS_BLOCK: &str =
        "[*]:Which planet is closest to the Sun?\n[A]:Mercury\n[C]:Venus\n[_]:A\n[;]:";

    /// Generator-style response: chatter first, then three blocks.
    pub fn three_block_markup() -> String {
        format!(
            "Sure! Here are your questions:\n{}\n[.]\n{}\n[.]\n{}\n[.]\n",
            ARITHMETIC_BLOCK, GEOGRAPHY_BLOCK, PLANETS_BLOCK
        )
    }

    pub fn arithmetic_record() -> QuestionRecord {
        QuestionRecord::new(
            "1+1=?",
            vec!["1".into(), "2".into(), "3".into(), "4".into()],
            "2",
            "1+1=2",
        )
    }

    pub fn geography_record() -> QuestionRecord {
        QuestionRecord::new(
            "Capital of France?",
            vec![
                "Berlin".into(),
                "Paris".into(),
                "Rome".into(),
                "Madrid".into(),
            ],
            "B",
            "Paris has been the capital for centuries.",
        )
    }

    pub fn sample_records() -> Vec<QuestionRecord> {
        vec![
            arithmetic_record(),
            geography_record(),
            QuestionRecord::new(
                "Which planet is closest to the Sun?",
                vec!["Mercury".into(), "Venus".into()],
                "A",
                "",
            )
            .with_labels(vec!['A', 'C']),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::services::markup_parser;

    #[test]
    fn test_fixture_markup_matches_fixture_records() {
        assert_eq!(markup_parser::parse(&three_block_markup()), sample_records());
    }

    #[test]
    fn test_fixture_records_are_complete() {
        assert!(sample_records().iter().all(|r| r.is_complete()));
    }
}
