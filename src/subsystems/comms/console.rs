//! Console channel — reads lines from stdin, dispatches them to the tutor,
//! prints the reply to stdout.
//!
//! Runs until `/exit`, stdin is closed, or the `shutdown` token is cancelled
//! (Ctrl-C). A command already in flight is awaited to completion; the token
//! is only observed while waiting for the next line.

use std::io::Write as _;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::subsystems::tutor::commands::parse_command;
use crate::subsystems::tutor::{Reply, Tutor};

// ── run_console ──────────────────────────────────────────────────────────────

pub async fn run_console(tutor: &mut Tutor, shutdown: CancellationToken) -> Result<(), AppError> {
    info!("console started");
    let stdin = BufReader::new(tokio::io::stdin());
    run_lines(tutor, stdin, shutdown, true).await
}

/// Drive the tutor from any line source. `prompt` controls the `> ` marker.
pub async fn run_lines<R>(
    tutor: &mut Tutor,
    reader: R,
    shutdown: CancellationToken,
    prompt: bool,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        if prompt {
            print!("> ");
            let _ = std::io::stdout().flush();
        }

        let input = tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                println!();
                info!("console: shutdown signal received");
                break;
            }

            line = lines.next_line() => match line {
                Err(e) => {
                    warn!("console read error: {e}");
                    break;
                }
                Ok(None) => {
                    info!("console: stdin closed");
                    break;
                }
                Ok(Some(input)) => input,
            },
        };

        let command = match parse_command(&input) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                println!("{}", render(&Reply::Warning(msg)));
                continue;
            }
        };
        debug!(?command, "console received command");

        let reply = tutor.handle(command).await;
        if reply == Reply::Exit {
            info!("console: exit requested");
            break;
        }
        println!("{}", render(&reply));
    }

    Ok(())
}

/// Text shown for one reply.
pub fn render(reply: &Reply) -> String {
    match reply {
        Reply::Answer(text) => format!("\nAI Assistant:\n{text}\n"),
        Reply::Info(text) => text.clone(),
        Reply::Warning(msg) => format!("warning: {msg}"),
        Reply::Error(msg) => format!("error: {msg}"),
        Reply::Exit => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm::providers;
    use crate::subsystems::memory::{PersistedLog, SessionStore};
    use crate::subsystems::tutor::selection::Subject;
    use tempfile::TempDir;

    fn tutor(dir: &TempDir) -> Tutor {
        let config = Config::offline(dir.path());
        let provider = providers::build(&config.llm, None).unwrap();
        let store = SessionStore::open(PersistedLog::new(&config.tutor.history_file));
        Tutor::new(&config, provider, store)
    }

    #[tokio::test]
    async fn drives_tutor_until_exit() {
        let dir = TempDir::new().unwrap();
        let mut t = tutor(&dir);
        let input: &[u8] = b"/subject math\n\nWhat is a prime?\n/bogus\n/exit\nnot reached\n";

        run_lines(&mut t, input, CancellationToken::new(), false).await.unwrap();

        assert_eq!(t.session().selection.subject, Subject::Math);
        assert_eq!(t.session().store.records().len(), 1);
        assert_eq!(t.session().store.records()[0].question, "What is a prime?");
    }

    #[tokio::test]
    async fn stops_at_end_of_input() {
        let dir = TempDir::new().unwrap();
        let mut t = tutor(&dir);
        let input: &[u8] = b"q1\nq2";
        run_lines(&mut t, input, CancellationToken::new(), false).await.unwrap();
        assert_eq!(t.session().store.records().len(), 2);
    }

    #[tokio::test]
    async fn cancelled_token_stops_before_reading() {
        let dir = TempDir::new().unwrap();
        let mut t = tutor(&dir);
        let token = CancellationToken::new();
        token.cancel();
        let input: &[u8] = b"q1\n";
        run_lines(&mut t, input, token, false).await.unwrap();
        assert!(t.session().store.records().is_empty());
    }

    #[test]
    fn render_prefixes_by_kind() {
        assert_eq!(render(&Reply::Warning("x".into())), "warning: x");
        assert_eq!(render(&Reply::Error("y".into())), "error: y");
        assert!(render(&Reply::Answer("z".into())).contains("AI Assistant:\nz"));
    }
}
