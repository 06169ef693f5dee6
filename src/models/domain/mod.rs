pub mod question_record;
pub mod session;
pub use question_record::QuestionRecord;
pub use session::{SessionEvent, SessionOutcome, SessionState};
