use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use uyghurly_account::UserRepository;
use uyghurly_types::{LessonStatus, QuizRecord, UnitProgress};

use super::harness;
use crate::ProgressError;

fn lesson_done(score: u32) -> LessonStatus {
    LessonStatus {
        completed: true,
        score,
        total_questions: 12,
        completed_at: Utc::now(),
    }
}

fn quiz(score: u32) -> QuizRecord {
    QuizRecord {
        score,
        total_questions: 20,
        correct_answers: score / 5,
        completed_at: Utc::now(),
        passed: score >= 70,
        answers: Default::default(),
    }
}

#[tokio::test]
async fn guest_progress_stays_local() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), &[]).await;
    h.accounts.login_as_guest().await;

    h.progress.record_lesson("greetings", &lesson_done(8)).await.unwrap();
    h.progress.record_quiz("basics", &quiz(90)).await.unwrap();

    assert!(h.progress.tracker().is_lesson_completed("greetings").unwrap());
    assert_eq!(h.progress.quiz_record("basics").unwrap().unwrap().score, 90);
    assert_eq!(h.accounts.user_document().await.unwrap(), None);
}

#[tokio::test]
async fn signed_in_progress_is_mirrored_by_unit() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), &[]).await;
    let user = h.accounts.login("aynur@example.com", "Passw0rd").await.unwrap();

    h.progress.record_lesson("greetings", &lesson_done(8)).await.unwrap();
    h.progress.record_quiz("food", &quiz(40)).await.unwrap();
    h.progress.record_quiz("basics", &quiz(85)).await.unwrap();

    let doc = h.users.get_user_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(doc.profile.lessons_completed, 1);
    assert_eq!(doc.progress["basics"].lesson_completed, Some(true));
    assert_eq!(doc.progress["basics"].quiz_score, Some(85));
    assert!(!doc.progress.contains_key("food"));

    // the failed quiz is still kept locally
    assert!(!h.progress.quiz_record("food").unwrap().unwrap().passed);
}

#[tokio::test]
async fn reconcile_restores_newer_remote_quizzes() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), &[]).await;
    h.accounts.login("aynur@example.com", "Passw0rd").await.unwrap();

    let stale = QuizRecord {
        completed_at: Utc::now() - Duration::days(2),
        ..quiz(50)
    };
    h.progress.tracker().save_quiz("people", &stale).unwrap();
    h.progress.tracker().save_quiz("travel", &quiz(95)).unwrap();

    let yesterday = Utc::now() - Duration::days(1);
    for (unit, score) in [("people", 80), ("travel", 70), ("food", 75)] {
        h.accounts
            .update_user_progress(
                unit,
                &UnitProgress {
                    quiz_completed: Some(true),
                    quiz_score: Some(score),
                    completed_at: Some(yesterday),
                    ..UnitProgress::default()
                },
            )
            .await
            .unwrap();
    }

    assert_eq!(h.progress.reconcile().await.unwrap(), 2);
    assert_eq!(h.progress.quiz_record("people").unwrap().unwrap().score, 80);
    assert_eq!(h.progress.quiz_record("travel").unwrap().unwrap().score, 95);
    assert!(h.progress.quiz_record("food").unwrap().unwrap().passed);
}

#[tokio::test]
async fn reconcile_without_account_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), &[]).await;
    assert_eq!(h.progress.reconcile().await.unwrap(), 0);
}

#[tokio::test]
async fn admin_tools_require_admin() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path(), &["admin@example.com"]).await;
    h.progress.tracker().save_lesson("numbers", &LessonStatus {
        completed: false,
        ..lesson_done(1)
    }).unwrap();

    h.accounts.login("someone@example.com", "Passw0rd").await.unwrap();
    assert!(matches!(
        h.progress.complete_all_lessons().await,
        Err(ProgressError::NotAdmin)
    ));

    h.accounts.logout().await;
    h.accounts.login("admin@example.com", "Passw0rd").await.unwrap();
    assert_eq!(h.progress.complete_all_lessons().await.unwrap(), 1);
    assert!(h.progress.tracker().is_lesson_completed("numbers").unwrap());

    let summary = h.progress.summary();
    assert_eq!(summary.lessons_completed, 1);
    assert_eq!(
        summary.words_learned,
        h.catalog.get_lesson_by_slug("numbers").unwrap().vocabulary.len()
    );

    assert_eq!(h.progress.clear_progress().await.unwrap(), 1);
    assert_eq!(h.progress.summary().lessons_completed, 0);
}
