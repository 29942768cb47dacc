//! UI-side collaborators the screens call out to: transient notifications
//! and the yes/no confirmation dialog.

use async_trait::async_trait;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);
}

/// Sends notifications to the log instead of a popup.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Success => info!(notification = message, "success"),
            NotificationKind::Error => warn!(notification = message, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub body: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Resolves to `true` only on an explicit yes.
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}

pub struct MissingConfirmer;

#[async_trait]
impl Confirmer for MissingConfirmer {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        warn!(title = %prompt.title, "no confirmation dialog is attached; declining");
        false
    }
}
