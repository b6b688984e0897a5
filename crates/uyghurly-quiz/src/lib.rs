pub mod attempt;
pub mod cache;
pub mod error;
pub mod generator;
pub mod session;

pub use attempt::QuizAttempt;
pub use cache::QuizCache;
pub use error::QuizError;
pub use generator::QuizGenerator;
pub use session::{AnswerOutcome, LessonSession, PracticeItem};
