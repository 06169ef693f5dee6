pub mod markup_parser;
pub mod question_generator;
pub mod quiz_attempt_service;
pub mod quiz_service;
pub mod selection_tracker;
pub mod session_controller;

pub use question_generator::{OpenAiQuestionGenerator, QuestionGenerator};
pub use quiz_attempt_service::QuizAttemptTally;
pub use quiz_service::QuizService;
pub use selection_tracker::{RefreshSignal, SelectionTracker};
pub use session_controller::SessionController;
