#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A line typed by the learner
    TextInput(String),
    ShowQuestion(DisplayQuestion),
    ShowFeedback(AnswerFeedback),
    SessionFinished(SessionSummary),
    StatusUpdate(String),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    MultipleChoice,
    Typing,
}

#[derive(Debug, Clone)]
pub struct DisplayQuestion {
    /// 1-based
    pub position: usize,
    pub total: usize,
    pub kind: PromptKind,
    pub prompt: String,
    pub options: Vec<String>,
    pub hint: Option<String>,
    pub lives: u32,
    pub score: u32,
}

#[derive(Debug, Clone)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub user_answer: String,
    pub correct_answer: String,
    pub lives: u32,
    pub score: u32,
}

#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub slug: String,
    pub score: u32,
    pub total_questions: u32,
    pub game_over: bool,
}
