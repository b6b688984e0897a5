//! Bulk edits of local progress used from the admin tools.
//!
//! Only records that already exist are touched by the completion helpers.

use chrono::{DateTime, Utc};
use uyghurly_types::{LessonStatus, QuizRecord};

use crate::error::ProgressError;
use crate::tracker::{LESSON_PREFIX, ProgressTracker, QUIZ_PREFIX};

const FULL_SCORE: u32 = 100;
const NOMINAL_QUESTIONS: u32 = 10;

/// Mark every stored lesson record complete with a perfect score
pub fn complete_all_lessons(
    tracker: &ProgressTracker,
    now: DateTime<Utc>,
) -> Result<usize, ProgressError> {
    let keys = tracker.lesson_keys()?;
    let status = LessonStatus {
        completed: true,
        score: FULL_SCORE,
        total_questions: NOMINAL_QUESTIONS,
        completed_at: now,
    };

    for key in &keys {
        let slug = key.trim_start_matches(LESSON_PREFIX);
        tracker.save_lesson(slug, &status)?;
    }
    tracing::info!("Admin: completed {} lessons", keys.len());
    Ok(keys.len())
}

/// Mark every stored quiz record passed with a perfect score
pub fn complete_all_quizzes(
    tracker: &ProgressTracker,
    now: DateTime<Utc>,
) -> Result<usize, ProgressError> {
    let keys = tracker.quiz_keys()?;
    let record = QuizRecord {
        score: FULL_SCORE,
        total_questions: NOMINAL_QUESTIONS,
        correct_answers: NOMINAL_QUESTIONS,
        completed_at: now,
        passed: true,
        answers: Default::default(),
    };

    for key in &keys {
        let unit_id = key.trim_start_matches(QUIZ_PREFIX);
        tracker.save_quiz(unit_id, &record)?;
    }
    tracing::info!("Admin: completed {} quizzes", keys.len());
    Ok(keys.len())
}

/// Remove every lesson and quiz record
pub fn clear_progress(tracker: &ProgressTracker) -> Result<usize, ProgressError> {
    let mut keys = tracker.lesson_keys()?;
    keys.extend(tracker.quiz_keys()?);

    for key in &keys {
        tracker.remove(key)?;
    }
    tracing::info!("Admin: cleared {} progress records", keys.len());
    Ok(keys.len())
}
