use chrono::{DateTime, Local};
use uyghurly_lang_uyghur::LessonCatalog;

use crate::tracker::ProgressTracker;

/// Figures shown on the profile page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSummary {
    pub lessons_completed: usize,
    pub total_lessons: usize,
    /// Units whose quiz was passed
    pub units_completed: usize,
    pub total_units: usize,
    /// Vocabulary size of the completed lessons
    pub words_learned: usize,
    /// Rounded mean score of the passed quizzes
    pub quiz_average: u32,
    pub lessons_today: usize,
}

impl ProgressSummary {
    pub fn lessons_percent(&self) -> u32 {
        percent(self.lessons_completed, self.total_lessons)
    }

    pub fn units_percent(&self) -> u32 {
        percent(self.units_completed, self.total_units)
    }
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// Walk every lesson and unit of the catalog; unreadable records are skipped
pub fn summarize(
    tracker: &ProgressTracker,
    catalog: &LessonCatalog,
    now: DateTime<Local>,
) -> ProgressSummary {
    let today = now.date_naive();
    let mut summary = ProgressSummary {
        total_lessons: catalog.get_all_lessons().len(),
        total_units: catalog.units().len(),
        ..ProgressSummary::default()
    };

    for lesson in catalog.get_all_lessons() {
        let status = match tracker.lesson_status(&lesson.slug) {
            Ok(Some(status)) if status.completed => status,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("Skipping lesson record: {e}");
                continue;
            }
        };

        summary.lessons_completed += 1;
        summary.words_learned += lesson.vocabulary.len();
        if status.completed_at.with_timezone(&Local).date_naive() == today {
            summary.lessons_today += 1;
        }
    }

    let mut scores = Vec::new();
    for unit in catalog.units() {
        match tracker.quiz_record(&unit.id) {
            Ok(Some(record)) if record.passed => scores.push(record.score),
            Ok(_) => {}
            Err(e) => tracing::warn!("Skipping quiz record: {e}"),
        }
    }

    summary.units_completed = scores.len();
    if !scores.is_empty() {
        let total: u32 = scores.iter().sum();
        summary.quiz_average = (f64::from(total) / scores.len() as f64).round() as u32;
    }

    summary
}
