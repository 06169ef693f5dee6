use serde::Serialize;

use crate::models::domain::SessionOutcome;

/// Running score over the sessions of one quiz attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuizAttemptTally {
    pub total: u32,
    pub answered: u32,
    pub correct: u32,
    pub timed_out: u32,
}

impl QuizAttemptTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &SessionOutcome) {
        self.total += 1;
        if outcome.timed_out {
            self.timed_out += 1;
        } else {
            self.answered += 1;
        }
        if outcome.is_correct {
            self.correct += 1;
        }
    }

    /// Sessions cancelled before an outcome still count against the total.
    pub fn record_abandoned(&mut self) {
        self.total += 1;
    }

    pub fn passed(&self, required_score: u32) -> bool {
        self.correct >= required_score
    }

    pub fn summary(&self) -> String {
        format!(
            "{}/{} correct ({} answered, {} timed out)",
            self.correct, self.total, self.answered, self.timed_out
        )
    }
}

impl<'a> FromIterator<&'a SessionOutcome> for QuizAttemptTally {
    fn from_iter<I: IntoIterator<Item = &'a SessionOutcome>>(iter: I) -> Self {
        let mut tally = QuizAttemptTally::new();
        for outcome in iter {
            tally.record(outcome);
        }
        tally
    }
}
