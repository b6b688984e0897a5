use std::sync::Arc;

use chrono::{Local, Utc};
use uyghurly_account::AccountService;
use uyghurly_core::storage::KeyValueStore;
use uyghurly_lang_uyghur::LessonCatalog;
use uyghurly_types::{LessonStatus, QuizRecord, UnitProgress};

use crate::admin;
use crate::error::ProgressError;
use crate::settings::Settings;
use crate::stats::{self, ProgressSummary};
use crate::tracker::ProgressTracker;

/// Local progress with best-effort mirroring to the signed-in user's document.
///
/// Local storage is authoritative; a failed mirror is logged and dropped.
pub struct ProgressService {
    tracker: ProgressTracker,
    settings: Settings,
    accounts: Arc<AccountService>,
    catalog: Arc<LessonCatalog>,
}

impl ProgressService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        accounts: Arc<AccountService>,
        catalog: Arc<LessonCatalog>,
    ) -> Self {
        Self {
            tracker: ProgressTracker::new(store.clone()),
            settings: Settings::new(store),
            accounts,
            catalog,
        }
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn record_lesson(
        &self,
        slug: &str,
        status: &LessonStatus,
    ) -> Result<(), ProgressError> {
        self.tracker.save_lesson(slug, status)?;

        if !status.completed {
            return Ok(());
        }
        let Some(unit_id) = self.unit_id_for_lesson(slug) else {
            tracing::debug!("Lesson {slug} has no unit, not syncing");
            return Ok(());
        };
        let update = UnitProgress {
            lesson_completed: Some(true),
            completed_at: Some(status.completed_at),
            ..UnitProgress::default()
        };
        self.mirror(&unit_id, &update).await;
        Ok(())
    }

    pub async fn record_quiz(
        &self,
        unit_id: &str,
        record: &QuizRecord,
    ) -> Result<(), ProgressError> {
        self.tracker.save_quiz(unit_id, record)?;

        if record.passed {
            let update = UnitProgress {
                quiz_completed: Some(true),
                quiz_score: Some(record.score),
                completed_at: Some(record.completed_at),
                ..UnitProgress::default()
            };
            self.mirror(unit_id, &update).await;
        }
        Ok(())
    }

    pub fn lesson_status(&self, slug: &str) -> Result<Option<LessonStatus>, ProgressError> {
        self.tracker.lesson_status(slug)
    }

    pub fn quiz_record(&self, unit_id: &str) -> Result<Option<QuizRecord>, ProgressError> {
        self.tracker.quiz_record(unit_id)
    }

    pub fn summary(&self) -> ProgressSummary {
        stats::summarize(&self.tracker, &self.catalog, Local::now())
    }

    /// Copy passed quizzes from the user document into local storage where
    /// the remote result is newer. Returns how many records were restored.
    pub async fn reconcile(&self) -> Result<usize, ProgressError> {
        let Some(doc) = self.accounts.user_document().await? else {
            return Ok(0);
        };

        let mut restored = 0;
        for (unit_id, remote) in &doc.progress {
            if remote.quiz_completed != Some(true) {
                continue;
            }
            let (Some(score), Some(completed_at)) = (remote.quiz_score, remote.completed_at)
            else {
                continue;
            };

            let local = match self.tracker.quiz_record(unit_id) {
                Ok(local) => local,
                Err(e) => {
                    tracing::warn!("Replacing unreadable quiz record for {unit_id}: {e}");
                    None
                }
            };
            if local.is_some_and(|l| l.completed_at >= completed_at) {
                continue;
            }

            let record = QuizRecord {
                score,
                total_questions: 0,
                correct_answers: 0,
                completed_at,
                passed: true,
                answers: Default::default(),
            };
            self.tracker.save_quiz(unit_id, &record)?;
            restored += 1;
        }

        if restored > 0 {
            tracing::info!("Restored {restored} quiz results from account");
        }
        Ok(restored)
    }

    pub async fn complete_all_lessons(&self) -> Result<usize, ProgressError> {
        self.require_admin().await?;
        admin::complete_all_lessons(&self.tracker, Utc::now())
    }

    pub async fn complete_all_quizzes(&self) -> Result<usize, ProgressError> {
        self.require_admin().await?;
        admin::complete_all_quizzes(&self.tracker, Utc::now())
    }

    pub async fn clear_progress(&self) -> Result<usize, ProgressError> {
        self.require_admin().await?;
        admin::clear_progress(&self.tracker)
    }

    async fn require_admin(&self) -> Result<(), ProgressError> {
        if self.accounts.is_admin().await {
            Ok(())
        } else {
            Err(ProgressError::NotAdmin)
        }
    }

    fn unit_id_for_lesson(&self, slug: &str) -> Option<String> {
        let lesson = self.catalog.get_lesson_by_slug(slug)?;
        self.catalog.find_unit(&lesson.unit).map(|u| u.id.clone())
    }

    async fn mirror(&self, unit_id: &str, update: &UnitProgress) {
        match self.accounts.current_user().await {
            Some(user) if !user.is_guest => {}
            _ => return,
        }
        if let Err(e) = self.accounts.update_user_progress(unit_id, update).await {
            tracing::warn!("Could not sync progress for {unit_id}: {e}");
        }
    }
}
