use std::sync::Arc;

use uyghurly_core::storage::{KeyValueStore, read_json, write_json};
use uyghurly_types::{LessonStatus, QuizRecord};

use crate::error::ProgressError;

pub const LESSON_PREFIX: &str = "lesson-";
pub const QUIZ_PREFIX: &str = "quiz-";

pub fn lesson_key(slug: &str) -> String {
    format!("{LESSON_PREFIX}{slug}")
}

pub fn quiz_key(unit_id: &str) -> String {
    format!("{QUIZ_PREFIX}{unit_id}")
}

/// Typed access to the lesson and quiz records in local storage
#[derive(Clone)]
pub struct ProgressTracker {
    store: Arc<dyn KeyValueStore>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn save_lesson(&self, slug: &str, status: &LessonStatus) -> Result<(), ProgressError> {
        write_json(self.store.as_ref(), &lesson_key(slug), status)?;
        tracing::debug!("Saved lesson {slug}: {}/{}", status.score, status.total_questions);
        Ok(())
    }

    pub fn lesson_status(&self, slug: &str) -> Result<Option<LessonStatus>, ProgressError> {
        Ok(read_json(self.store.as_ref(), &lesson_key(slug))?)
    }

    pub fn is_lesson_completed(&self, slug: &str) -> Result<bool, ProgressError> {
        Ok(self.lesson_status(slug)?.is_some_and(|s| s.completed))
    }

    pub fn save_quiz(&self, unit_id: &str, record: &QuizRecord) -> Result<(), ProgressError> {
        write_json(self.store.as_ref(), &quiz_key(unit_id), record)?;
        tracing::debug!("Saved quiz {unit_id}: {}% passed={}", record.score, record.passed);
        Ok(())
    }

    pub fn quiz_record(&self, unit_id: &str) -> Result<Option<QuizRecord>, ProgressError> {
        Ok(read_json(self.store.as_ref(), &quiz_key(unit_id))?)
    }

    pub fn lesson_keys(&self) -> Result<Vec<String>, ProgressError> {
        Ok(self.store.keys_with_prefix(LESSON_PREFIX)?)
    }

    pub fn quiz_keys(&self) -> Result<Vec<String>, ProgressError> {
        Ok(self.store.keys_with_prefix(QUIZ_PREFIX)?)
    }

    pub fn remove(&self, key: &str) -> Result<(), ProgressError> {
        Ok(self.store.remove(key)?)
    }
}
