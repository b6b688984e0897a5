#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("No lessons found for unit: {0}")]
    UnitNotFound(String),

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("\"{answer}\" is not an option for question {question_id}")]
    InvalidOption { question_id: String, answer: String },

    #[error("Answer all questions before submitting ({answered}/{total} answered)")]
    Incomplete { answered: usize, total: usize },

    #[error("Quiz already submitted")]
    AlreadySubmitted,

    #[error("Answer cannot be empty")]
    EmptyAnswer,

    #[error("Session is already over")]
    SessionOver,
}
