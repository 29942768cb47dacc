//! Terminal stand-ins for the notification popup and the confirmation
//! dialog.

use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use client_core::{ConfirmPrompt, Confirmer, NotificationKind, Notifier, TracingNotifier};
use tracing::warn;

/// Successes go to stdout; errors go to the log on stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Success => println!("{message}"),
            NotificationKind::Error => TracingNotifier.notify(kind, message),
        }
    }
}

/// Asks on stdin; anything but an explicit yes declines.
pub struct StdinConfirmer;

#[async_trait]
impl Confirmer for StdinConfirmer {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        let prompt = prompt.clone();
        let answer = tokio::task::spawn_blocking(move || -> io::Result<String> {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", prompt.title)?;
            write!(
                stdout,
                "{} ({} / {}) [s/N] ",
                prompt.body, prompt.confirm_label, prompt.cancel_label
            )?;
            stdout.flush()?;

            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => is_yes(&line),
            Ok(Err(err)) => {
                warn!(error = %err, "failed to read confirmation");
                false
            }
            Err(err) => {
                warn!(error = %err, "confirmation prompt task failed");
                false
            }
        }
    }
}

/// Confirms without asking, for `--yes`.
pub struct AssumeYes;

#[async_trait]
impl Confirmer for AssumeYes {
    async fn confirm(&self, _prompt: &ConfirmPrompt) -> bool {
        true
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("s\n"));
        assert!(is_yes(" Sim "));
        assert!(is_yes("y"));
        assert!(!is_yes(""));
        assert!(!is_yes("\n"));
        assert!(!is_yes("n"));
        assert!(!is_yes("talvez"));
    }

    #[tokio::test]
    async fn assume_yes_confirms() {
        let prompt = ConfirmPrompt {
            title: "Confirmar exclusão".into(),
            body: "Tem certeza?".into(),
            confirm_label: "Sim".into(),
            cancel_label: "Cancelar".into(),
        };
        assert!(AssumeYes.confirm(&prompt).await);
    }
}
