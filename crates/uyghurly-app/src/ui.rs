use std::fmt::Write;

use kanal::AsyncReceiver;
use tokio_util::sync::CancellationToken;
use uyghurly_types::{AppEvent, DisplayQuestion, PromptKind};

/// Text shown for an event; `None` for events the terminal ignores
pub fn render(event: &AppEvent) -> Option<String> {
    match event {
        AppEvent::ShowQuestion(question) => Some(render_question(question)),
        AppEvent::ShowFeedback(feedback) => Some(if feedback.correct {
            format!("Correct! (score {})", feedback.score)
        } else {
            format!(
                "Incorrect. The answer is \"{}\". Lives left: {}",
                feedback.correct_answer, feedback.lives
            )
        }),
        AppEvent::StatusUpdate(status) => Some(status.clone()),
        AppEvent::SessionFinished(summary) => Some(if summary.game_over {
            format!(
                "Game over! You scored {} out of {}.",
                summary.score, summary.total_questions
            )
        } else {
            format!(
                "Lesson complete! You scored {} out of {}.",
                summary.score, summary.total_questions
            )
        }),
        AppEvent::Quit => Some("Practice ended, progress not saved.".to_string()),
        AppEvent::TextInput(_) => None,
    }
}

fn render_question(question: &DisplayQuestion) -> String {
    let mut out = format!(
        "\n[{}/{}] lives {} | score {}\n{}",
        question.position, question.total, question.lives, question.score, question.prompt
    );
    match question.kind {
        PromptKind::MultipleChoice => {
            for (i, option) in question.options.iter().enumerate() {
                let _ = write!(out, "\n  {}. {}", i + 1, option);
            }
        }
        PromptKind::Typing => {
            if let Some(hint) = &question.hint {
                let _ = write!(out, "\n  hint: {hint}");
            }
        }
    }
    out
}

/// Print events until the session finishes, then stop the other tasks
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = app_to_ui_rx.recv() => event?,
        };

        if let Some(text) = render(&event) {
            println!("{text}");
        }
        if matches!(event, AppEvent::SessionFinished(_) | AppEvent::Quit) {
            cancel.cancel();
            break;
        }
    }

    Ok(())
}
