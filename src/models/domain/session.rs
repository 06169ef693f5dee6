use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    CountingDown,
    Locked,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::CountingDown => write!(f, "counting_down"),
            SessionState::Locked => write!(f, "locked"),
        }
    }
}

/// Result of one timed question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionOutcome {
    pub session_id: Uuid,
    pub chosen_option: Option<String>, // None when the countdown expired
    pub correct_answer: String,
    pub is_correct: bool,
    pub timed_out: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SessionOutcome {
    pub fn answered(
        session_id: Uuid,
        chosen: &str,
        correct_answer: &str,
        started_at: DateTime<Utc>,
    ) -> Self {
        SessionOutcome {
            session_id,
            chosen_option: Some(chosen.to_string()),
            correct_answer: correct_answer.to_string(),
            is_correct: chosen == correct_answer,
            timed_out: false,
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn expired(session_id: Uuid, correct_answer: &str, started_at: DateTime<Utc>) -> Self {
        SessionOutcome {
            session_id,
            chosen_option: None,
            correct_answer: correct_answer.to_string(),
            is_correct: false,
            timed_out: true,
            started_at,
            finished_at: Utc::now(),
        }
    }
}

/// Notifications emitted by a running session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Whole countdown units left, rounded up.
    Tick { remaining: u32 },
    Finished(SessionOutcome),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answered_outcome_compares_text() {
        let started = Utc::now();
        let right = SessionOutcome::answered(Uuid::new_v4(), "2", "2", started);
        let wrong = SessionOutcome::answered(Uuid::new_v4(), "3", "2", started);

        assert!(right.is_correct);
        assert!(!right.timed_out);
        assert!(!wrong.is_correct);
        assert_eq!(wrong.chosen_option.as_deref(), Some("3"));
    }

    #[test]
    fn test_expired_outcome_is_never_correct() {
        let outcome = SessionOutcome::expired(Uuid::new_v4(), "2", Utc::now());

        assert!(outcome.timed_out);
        assert!(!outcome.is_correct);
        assert!(outcome.chosen_option.is_none());
        assert!(outcome.finished_at >= outcome.started_at);
    }

    #[test]
    fn test_session_state_display() {
        assert_eq!(SessionState::CountingDown.to_string(), "counting_down");
        let json = serde_json::to_string(&SessionState::Locked).expect("state should serialize");
        assert_eq!(json, "\"locked\"");
    }
}
