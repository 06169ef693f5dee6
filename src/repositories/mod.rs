pub mod question_repository;

pub use question_repository::{KeyValueQuestionRepository, QuestionRepository, DEFAULT_STORAGE_KEY};
