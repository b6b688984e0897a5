use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use uyghurly_core::text::is_correct_answer;
use uyghurly_types::{
    AnswerFeedback, DisplayQuestion, Exercise, LessonContent, LessonStatus, PromptKind,
    SessionSummary, TypingQuestion,
};

use crate::error::QuizError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PracticeItem {
    Choice(Exercise),
    Typing(TypingQuestion),
}

impl PracticeItem {
    pub fn correct_answer(&self) -> &str {
        match self {
            PracticeItem::Choice(exercise) => &exercise.correct_answer,
            PracticeItem::Typing(question) => &question.correct_answer,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub feedback: AnswerFeedback,
    /// True once the last question is answered or the lives ran out
    pub finished: bool,
}

/// One run through a lesson: its exercises and typing questions shuffled together
#[derive(Debug, Clone)]
pub struct LessonSession {
    slug: String,
    items: Vec<PracticeItem>,
    position: usize,
    lives: u32,
    score: u32,
    game_over: bool,
}

impl LessonSession {
    pub fn new<R: Rng + ?Sized>(lesson: &LessonContent, lives: u32, rng: &mut R) -> Self {
        let mut items: Vec<PracticeItem> = lesson
            .exercises
            .iter()
            .cloned()
            .map(PracticeItem::Choice)
            .chain(lesson.typing_questions.iter().cloned().map(PracticeItem::Typing))
            .collect();
        items.shuffle(rng);

        Self {
            slug: lesson.slug.clone(),
            items,
            position: 0,
            lives,
            score: 0,
            game_over: false,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total_questions(&self) -> usize {
        self.items.len()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_finished(&self) -> bool {
        self.game_over || self.position >= self.items.len()
    }

    pub fn current(&self) -> Option<&PracticeItem> {
        if self.game_over {
            return None;
        }
        self.items.get(self.position)
    }

    pub fn display_question(&self) -> Option<DisplayQuestion> {
        let item = self.current()?;
        let (kind, prompt, options, hint) = match item {
            PracticeItem::Choice(exercise) => (
                PromptKind::MultipleChoice,
                exercise.question.clone(),
                exercise.options.clone(),
                None,
            ),
            PracticeItem::Typing(question) => (
                PromptKind::Typing,
                question.question.clone(),
                Vec::new(),
                question.hint.clone(),
            ),
        };

        Some(DisplayQuestion {
            position: self.position + 1,
            total: self.items.len(),
            kind,
            prompt,
            options,
            hint,
            lives: self.lives,
            score: self.score,
        })
    }

    /// Grade `input` against the current question and advance.
    ///
    /// Multiple-choice input may be the option text or its 1-based number.
    pub fn answer(&mut self, input: &str) -> Result<AnswerOutcome, QuizError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(QuizError::EmptyAnswer);
        }
        let item = self.current().ok_or(QuizError::SessionOver)?;

        let (user_answer, correct) = match item {
            PracticeItem::Choice(exercise) => {
                let chosen = resolve_option(&exercise.options, input).ok_or_else(|| {
                    QuizError::InvalidOption {
                        question_id: format!("{}#{}", self.slug, self.position + 1),
                        answer: input.to_string(),
                    }
                })?;
                let correct = chosen == exercise.correct_answer;
                (chosen, correct)
            }
            PracticeItem::Typing(question) => (
                input.to_string(),
                is_correct_answer(input, &question.correct_answer),
            ),
        };
        let correct_answer = item.correct_answer().to_string();

        if correct {
            self.score += 1;
        } else {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                self.game_over = true;
            }
        }
        self.position += 1;

        Ok(AnswerOutcome {
            feedback: AnswerFeedback {
                correct,
                user_answer,
                correct_answer,
                lives: self.lives,
                score: self.score,
            },
            finished: self.is_finished(),
        })
    }

    /// `lesson-<slug>` record for the run so far; game over still counts as completed
    pub fn record(&self, now: DateTime<Utc>) -> LessonStatus {
        LessonStatus {
            completed: true,
            score: self.score,
            total_questions: self.items.len() as u32,
            completed_at: now,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            slug: self.slug.clone(),
            score: self.score,
            total_questions: self.items.len() as u32,
            game_over: self.game_over,
        }
    }
}

fn resolve_option(options: &[String], input: &str) -> Option<String> {
    if let Ok(number) = input.parse::<usize>() {
        if (1..=options.len()).contains(&number) {
            return Some(options[number - 1].clone());
        }
    }
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(input))
        .cloned()
}
