use kanal::AsyncSender;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use uyghurly_types::AppEvent;

const QUIT_COMMANDS: [&str; 2] = [":q", ":quit"];

pub fn parse_input(line: &str) -> AppEvent {
    if QUIT_COMMANDS.contains(&line.trim()) {
        AppEvent::Quit
    } else {
        AppEvent::TextInput(line.to_string())
    }
}

/// Forward stdin lines to the event loop until EOF or cancellation
pub async fn input_loop(
    event_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };

        let event = match line {
            Some(line) => parse_input(&line),
            None => {
                tracing::debug!("stdin closed");
                AppEvent::Quit
            }
        };
        let quit = matches!(event, AppEvent::Quit);

        if let Err(e) = event_tx.send(event).await {
            tracing::debug!("Event loop gone: {e}");
            break;
        }
        if quit {
            break;
        }
    }

    Ok(())
}
