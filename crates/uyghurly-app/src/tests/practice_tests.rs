use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use uyghurly_quiz::{LessonSession, PracticeItem};
use uyghurly_types::{AppEvent, SessionSummary};

use super::test_state;
use crate::events::event_loop;
use crate::state::AppState;

struct Running {
    input: AsyncSender<AppEvent>,
    output: AsyncReceiver<AppEvent>,
    task: tokio::task::JoinHandle<anyhow::Result<()>>,
}

fn session(state: &AppState, slug: &str) -> LessonSession {
    let lesson = state.catalog.get_lesson_by_slug(slug).unwrap();
    LessonSession::new(lesson, 3, &mut StdRng::seed_from_u64(5))
}

fn correct_answers(session: &LessonSession) -> Vec<String> {
    let mut probe = session.clone();
    let mut answers = Vec::new();
    while let Some(item) = probe.current() {
        let answer = item.correct_answer().to_string();
        probe.answer(&answer).unwrap();
        answers.push(answer);
    }
    answers
}

fn wrong_answers(session: &LessonSession, count: usize) -> Vec<String> {
    let mut probe = session.clone();
    let mut answers = Vec::new();
    while let Some(item) = probe.current() {
        if answers.len() == count {
            break;
        }
        let answer = match item {
            PracticeItem::Choice(exercise) => exercise
                .options
                .iter()
                .find(|o| **o != exercise.correct_answer)
                .cloned()
                .unwrap(),
            PracticeItem::Typing(_) => "zzz".to_string(),
        };
        probe.answer(&answer).unwrap();
        answers.push(answer);
    }
    answers
}

fn start(state: Arc<AppState>, session: LessonSession) -> Running {
    let (input, input_rx) = kanal::bounded_async(8);
    let (output_tx, output) = kanal::bounded_async(8);
    let task = tokio::spawn(event_loop(
        state,
        session,
        input_rx,
        output_tx,
        CancellationToken::new(),
    ));
    Running {
        input,
        output,
        task,
    }
}

fn feed(input: AsyncSender<AppEvent>, lines: Vec<String>) {
    tokio::spawn(async move {
        for line in lines {
            if input.send(AppEvent::TextInput(line)).await.is_err() {
                break;
            }
        }
    });
}

/// Drain events until the session ends
async fn finish(output: &AsyncReceiver<AppEvent>) -> (Vec<AppEvent>, SessionSummary) {
    let mut seen = Vec::new();
    loop {
        let event = timeout(Duration::from_secs(5), output.recv())
            .await
            .expect("Timeout - session never finished")
            .expect("channel closed");
        if let AppEvent::SessionFinished(summary) = event {
            return (seen, summary);
        }
        seen.push(event);
    }
}

#[tokio::test]
async fn perfect_run_saves_completed_lesson() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path()).await;
    let session = session(&state, "greetings");
    let total = session.total_questions() as u32;
    let answers = correct_answers(&session);

    let running = start(state.clone(), session);
    feed(running.input.clone(), answers);
    let (events, summary) = finish(&running.output).await;

    assert_eq!(summary.score, total);
    assert!(!summary.game_over);
    let feedback = events
        .iter()
        .filter(|e| matches!(e, AppEvent::ShowFeedback(f) if f.correct))
        .count();
    assert_eq!(feedback as u32, total);

    running.task.await.unwrap().unwrap();
    let status = state.progress.lesson_status("greetings").unwrap().unwrap();
    assert!(status.completed);
    assert_eq!(status.score, total);
}

#[tokio::test]
async fn three_misses_end_the_game() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path()).await;
    let session = session(&state, "colors");
    let misses = wrong_answers(&session, 3);
    let running = start(state.clone(), session);

    feed(running.input.clone(), misses);
    let (_, summary) = finish(&running.output).await;

    assert!(summary.game_over);
    assert_eq!(summary.score, 0);
    let status = state.progress.lesson_status("colors").unwrap().unwrap();
    assert!(status.completed);
    assert_eq!(status.score, 0);
}

#[tokio::test]
async fn blank_answer_is_reported_without_losing_a_life() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path()).await;
    let running = start(state.clone(), session(&state, "numbers"));

    assert!(matches!(
        running.output.recv().await.unwrap(),
        AppEvent::ShowQuestion(_)
    ));
    running
        .input
        .send(AppEvent::TextInput("   ".to_string()))
        .await
        .unwrap();
    match running.output.recv().await.unwrap() {
        AppEvent::StatusUpdate(text) => assert_eq!(text, "Please enter an answer."),
        other => panic!("unexpected event {other:?}"),
    }

    running.input.send(AppEvent::Quit).await.unwrap();
    assert!(matches!(running.output.recv().await.unwrap(), AppEvent::Quit));
    running.task.await.unwrap().unwrap();
    assert_eq!(state.progress.lesson_status("numbers").unwrap(), None);
}
