use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uyghurly_types::{QuizRecord, UnitQuiz};

use crate::error::QuizError;

/// Answers selected for one unit quiz, graded on submit
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    quiz: Arc<UnitQuiz>,
    answers: BTreeMap<String, String>,
    submitted: bool,
}

impl QuizAttempt {
    pub fn new(quiz: Arc<UnitQuiz>) -> Self {
        Self {
            quiz,
            answers: BTreeMap::new(),
            submitted: false,
        }
    }

    pub fn quiz(&self) -> &UnitQuiz {
        &self.quiz
    }

    /// Record (or replace) the answer to `question_id`; it must be one of the options
    pub fn select(&mut self, question_id: &str, answer: &str) -> Result<(), QuizError> {
        if self.submitted {
            return Err(QuizError::AlreadySubmitted);
        }

        let question = self
            .quiz
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| QuizError::UnknownQuestion(question_id.to_string()))?;

        if !question.options.iter().any(|o| o == answer) {
            return Err(QuizError::InvalidOption {
                question_id: question_id.to_string(),
                answer: answer.to_string(),
            });
        }

        self.answers.insert(question_id.to_string(), answer.to_string());
        Ok(())
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.quiz.questions.len()
    }

    /// Grade the attempt; every question must be answered first
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<QuizRecord, QuizError> {
        if self.submitted {
            return Err(QuizError::AlreadySubmitted);
        }
        if !self.is_complete() {
            return Err(QuizError::Incomplete {
                answered: self.answers.len(),
                total: self.quiz.questions.len(),
            });
        }

        let total = self.quiz.questions.len() as u32;
        let correct = self
            .quiz
            .questions
            .iter()
            .filter(|q| self.answers.get(&q.id) == Some(&q.correct_answer))
            .count() as u32;
        let score = percentage(correct, total);

        self.submitted = true;
        tracing::info!(
            "Quiz {} submitted: {correct}/{total} correct ({score}%)",
            self.quiz.unit_id
        );

        Ok(QuizRecord {
            score,
            total_questions: total,
            correct_answers: correct,
            completed_at: now,
            passed: score >= self.quiz.passing_score,
            answers: self.answers.clone(),
        })
    }
}

/// Rounded percentage; an empty quiz scores zero
pub fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(correct) / f64::from(total) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use uyghurly_types::{QuestionKind, QuizQuestion};

    use super::*;

    fn quiz(questions: usize) -> Arc<UnitQuiz> {
        Arc::new(UnitQuiz {
            unit_id: "basics".to_string(),
            unit_title: "Basics".to_string(),
            title: "Basics Unit Quiz".to_string(),
            description: "Test your knowledge of basics vocabulary and phrases".to_string(),
            questions: (0..questions)
                .map(|i| QuizQuestion {
                    id: format!("greetings_uyghur_to_english_{i}"),
                    question: format!("Question {i}"),
                    options: vec!["right".to_string(), "wrong".to_string()],
                    correct_answer: "right".to_string(),
                    explanation: None,
                    kind: QuestionKind::MultipleChoice,
                })
                .collect(),
            passing_score: 70,
            time_limit: Some(20),
            seed: 0,
        })
    }

    fn answer_all(attempt: &mut QuizAttempt, correct: usize) {
        let ids: Vec<String> = attempt.quiz().questions.iter().map(|q| q.id.clone()).collect();
        for (i, id) in ids.iter().enumerate() {
            let answer = if i < correct { "right" } else { "wrong" };
            attempt.select(id, answer).unwrap();
        }
    }

    #[test]
    fn score_is_rounded_percentage() {
        let mut attempt = QuizAttempt::new(quiz(3));
        answer_all(&mut attempt, 2);

        let record = attempt.submit(Utc::now()).unwrap();
        assert_eq!(record.score, 67);
        assert_eq!(record.correct_answers, 2);
        assert!(!record.passed);
        assert_eq!(record.answers.len(), 3);
    }

    #[test]
    fn passing_score_is_inclusive() {
        let mut attempt = QuizAttempt::new(quiz(10));
        answer_all(&mut attempt, 7);
        let record = attempt.submit(Utc::now()).unwrap();
        assert_eq!(record.score, 70);
        assert!(record.passed);
    }

    #[test]
    fn submit_requires_every_answer() {
        let mut attempt = QuizAttempt::new(quiz(2));
        attempt.select("greetings_uyghur_to_english_0", "right").unwrap();
        assert_eq!(
            attempt.submit(Utc::now()).unwrap_err(),
            QuizError::Incomplete {
                answered: 1,
                total: 2
            }
        );
    }

    #[test]
    fn selections_are_validated() {
        let mut attempt = QuizAttempt::new(quiz(1));
        assert!(matches!(
            attempt.select("nope", "right"),
            Err(QuizError::UnknownQuestion(_))
        ));
        assert!(matches!(
            attempt.select("greetings_uyghur_to_english_0", "maybe"),
            Err(QuizError::InvalidOption { .. })
        ));

        attempt.select("greetings_uyghur_to_english_0", "wrong").unwrap();
        attempt.select("greetings_uyghur_to_english_0", "right").unwrap();
        assert_eq!(attempt.answer_for("greetings_uyghur_to_english_0"), Some("right"));

        attempt.submit(Utc::now()).unwrap();
        assert_eq!(
            attempt.select("greetings_uyghur_to_english_0", "wrong"),
            Err(QuizError::AlreadySubmitted)
        );
    }

    #[test]
    fn empty_quiz_scores_zero() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
    }
}
