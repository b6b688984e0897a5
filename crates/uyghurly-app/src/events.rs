use std::sync::Arc;

use chrono::Utc;
use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;
use uyghurly_quiz::{LessonSession, QuizError};
use uyghurly_types::AppEvent;

use crate::state::AppState;

/// Practice session loop: answers in, feedback and questions out
pub async fn event_loop(
    state: Arc<AppState>,
    mut session: LessonSession,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    match session.display_question() {
        Some(question) => app_to_ui_tx.send(AppEvent::ShowQuestion(question)).await?,
        None => {
            app_to_ui_tx.send(AppEvent::SessionFinished(session.summary())).await?;
            return Ok(());
        }
    }

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => event?,
        };

        match event {
            AppEvent::TextInput(text) => {
                if handle_answer(&state, &mut session, &text, &app_to_ui_tx).await? {
                    break;
                }
            }
            AppEvent::Quit => {
                tracing::info!("Practice of {} abandoned", session.slug());
                app_to_ui_tx.send(AppEvent::Quit).await?;
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

/// Returns true once the session is over
async fn handle_answer(
    state: &AppState,
    session: &mut LessonSession,
    text: &str,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<bool> {
    let outcome = match session.answer(text) {
        Ok(outcome) => outcome,
        Err(QuizError::EmptyAnswer) => {
            app_to_ui_tx
                .send(AppEvent::StatusUpdate("Please enter an answer.".to_string()))
                .await?;
            return Ok(false);
        }
        Err(e) => {
            app_to_ui_tx.send(AppEvent::StatusUpdate(e.to_string())).await?;
            return Ok(false);
        }
    };

    app_to_ui_tx.send(AppEvent::ShowFeedback(outcome.feedback)).await?;

    if !outcome.finished {
        if let Some(question) = session.display_question() {
            app_to_ui_tx.send(AppEvent::ShowQuestion(question)).await?;
        }
        return Ok(false);
    }

    let record = session.record(Utc::now());
    if let Err(e) = state.progress.record_lesson(session.slug(), &record).await {
        tracing::error!("Saving lesson progress failed: {e}");
        app_to_ui_tx
            .send(AppEvent::StatusUpdate(format!("Progress not saved: {e}")))
            .await?;
    }
    app_to_ui_tx.send(AppEvent::SessionFinished(session.summary())).await?;
    Ok(true)
}
