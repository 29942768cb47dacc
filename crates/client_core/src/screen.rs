//! Screen controller: owns the List Store and Edit Session for one admin
//! screen and runs the list / update / delete round trips against the
//! backend.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    client::AdminBackend,
    collaborators::{ConfirmPrompt, Confirmer, MissingConfirmer, NotificationKind, Notifier},
    edit_session::{ActiveEdit, EditForm, EditSession, EditState, SubmitRejected},
    error::ClientError,
    list_store::ListStore,
    record::AdminRecord,
    validation::ValidationErrors,
};

const EVENT_CHANNEL_CAPACITY: usize = 64;

pub type RecordOf<K> = <<K as ScreenKind>::Form as EditForm>::Record;
pub type IdOf<K> = <RecordOf<K> as AdminRecord>::Id;
pub type RequestOf<K> = <<K as ScreenKind>::Form as EditForm>::Request;

/// How the collection catches up with a successful update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Swap the returned record into place.
    Patch,
    /// Run a fresh list fetch.
    Refetch,
}

#[derive(Debug, Clone, Copy)]
pub struct ScreenMessages {
    pub list_failed: &'static str,
    pub update_succeeded: &'static str,
    pub update_failed: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteMessages {
    pub succeeded: &'static str,
    pub failed: &'static str,
}

/// Per-entity wiring of a screen: which form it edits, which endpoints it
/// calls and how it reconciles.
#[async_trait]
pub trait ScreenKind: Send + Sync + 'static {
    type Form: EditForm;

    const NAME: &'static str;
    const RECONCILIATION: Reconciliation;
    const MESSAGES: ScreenMessages;

    async fn list(&self, backend: &dyn AdminBackend) -> Result<Vec<RecordOf<Self>>, ClientError>;

    async fn update(
        &self,
        backend: &dyn AdminBackend,
        id: IdOf<Self>,
        request: &RequestOf<Self>,
    ) -> Result<Option<RecordOf<Self>>, ClientError>;
}

#[async_trait]
pub trait DeletableKind: ScreenKind {
    const DELETE_MESSAGES: DeleteMessages;

    fn delete_prompt(&self, record: Option<&RecordOf<Self>>) -> ConfirmPrompt;

    async fn delete(&self, backend: &dyn AdminBackend, id: IdOf<Self>) -> Result<(), ClientError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent<Id> {
    LoadingChanged(bool),
    CollectionReplaced { count: usize },
    RecordPatched(Id),
    RecordRemoved(Id),
    EditorOpened(Id),
    EditorClosed,
    SubmitPending(bool),
    ValidationFailed(ValidationErrors),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Committed { count: usize },
    /// A newer fetch was issued while this one was in flight.
    Stale,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    Invalid(ValidationErrors),
    Failed { message: String },
    NotOpen,
    AlreadySubmitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
    Failed { message: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("record {0} is not in the current collection")]
    UnknownRecord(String),
    #[error("no edit panel is open")]
    NotOpen,
    #[error("a submit is in flight")]
    Submitting,
}

/// Everything a presentation layer needs to draw the screen.
#[derive(Debug, Clone)]
pub struct ScreenSnapshot<F: EditForm> {
    pub records: Vec<F::Record>,
    pub loading: bool,
    pub fetched_at: Option<DateTime<Utc>>,
    pub editor: Option<ActiveEdit<F>>,
}

struct ScreenState<F: EditForm> {
    list: ListStore<F::Record>,
    editor: EditSession<F>,
}

pub struct AdminScreen<K: ScreenKind> {
    kind: K,
    backend: Arc<dyn AdminBackend>,
    notifier: Arc<dyn Notifier>,
    confirmer: Arc<dyn Confirmer>,
    inner: Mutex<ScreenState<K::Form>>,
    events: broadcast::Sender<ScreenEvent<IdOf<K>>>,
}

impl<K: ScreenKind> AdminScreen<K> {
    pub fn new(kind: K, backend: Arc<dyn AdminBackend>, notifier: Arc<dyn Notifier>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            kind,
            backend,
            notifier,
            confirmer: Arc::new(MissingConfirmer),
            inner: Mutex::new(ScreenState {
                list: ListStore::new(),
                editor: EditSession::new(),
            }),
            events,
        }
    }

    pub fn with_confirmer(mut self, confirmer: Arc<dyn Confirmer>) -> Self {
        self.confirmer = confirmer;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScreenEvent<IdOf<K>>> {
        self.events.subscribe()
    }

    fn emit(&self, event: ScreenEvent<IdOf<K>>) {
        let _ = self.events.send(event);
    }

    /// Initial population when the screen becomes visible.
    pub async fn activate(&self) -> FetchOutcome {
        info!(screen = K::NAME, "screen activated");
        self.refresh().await
    }

    pub async fn refresh(&self) -> FetchOutcome {
        let ticket = self.inner.lock().await.list.begin_fetch();
        self.emit(ScreenEvent::LoadingChanged(true));

        let result = self.kind.list(self.backend.as_ref()).await;

        let mut state = self.inner.lock().await;
        match result {
            Ok(records) => {
                let count = records.len();
                if !state.list.commit(ticket, records) {
                    debug!(
                        screen = K::NAME,
                        ticket = ticket.seq(),
                        "discarding stale list response"
                    );
                    return FetchOutcome::Stale;
                }
                drop(state);
                info!(screen = K::NAME, count, "collection refreshed");
                self.emit(ScreenEvent::CollectionReplaced { count });
                self.emit(ScreenEvent::LoadingChanged(false));
                FetchOutcome::Committed { count }
            }
            Err(err) => {
                if !state.list.fail(ticket) {
                    debug!(
                        screen = K::NAME,
                        ticket = ticket.seq(),
                        error = %err,
                        "ignoring stale list failure"
                    );
                    return FetchOutcome::Stale;
                }
                drop(state);
                warn!(screen = K::NAME, error = %err, "list fetch failed");
                self.emit(ScreenEvent::LoadingChanged(false));
                self.notifier
                    .notify(NotificationKind::Error, K::MESSAGES.list_failed);
                FetchOutcome::Failed
            }
        }
    }

    pub async fn snapshot(&self) -> ScreenSnapshot<K::Form> {
        let state = self.inner.lock().await;
        ScreenSnapshot {
            records: state.list.records().to_vec(),
            loading: state.list.loading(),
            fetched_at: state.list.fetched_at(),
            editor: state.editor.active().cloned(),
        }
    }

    pub async fn records(&self) -> Vec<RecordOf<K>> {
        self.inner.lock().await.list.records().to_vec()
    }

    pub async fn loading(&self) -> bool {
        self.inner.lock().await.list.loading()
    }

    pub async fn editor_state(&self) -> EditState {
        self.inner.lock().await.editor.state()
    }

    pub async fn editor(&self) -> Option<ActiveEdit<K::Form>> {
        self.inner.lock().await.editor.active().cloned()
    }

    /// Opens the edit panel on a record from the current collection,
    /// replacing any open session and its unsaved edits. Rejected while a
    /// submit is in flight.
    pub async fn open_editor(&self, id: IdOf<K>) -> Result<(), EditorError> {
        let mut state = self.inner.lock().await;
        let record = state
            .list
            .get(id)
            .cloned()
            .ok_or_else(|| EditorError::UnknownRecord(id.to_string()))?;
        if state.editor.open(&record).is_none() {
            debug!(screen = K::NAME, record_id = %id, "submit in flight; edit panel kept");
            return Err(EditorError::Submitting);
        }
        drop(state);

        debug!(screen = K::NAME, record_id = %id, "edit panel opened");
        self.emit(ScreenEvent::EditorOpened(id));
        Ok(())
    }

    pub async fn update_form(
        &self,
        edit: impl FnOnce(&mut K::Form) + Send,
    ) -> Result<(), EditorError> {
        if self.inner.lock().await.editor.update(edit) {
            Ok(())
        } else {
            Err(EditorError::NotOpen)
        }
    }

    pub async fn close_editor(&self) -> bool {
        let closed = self.inner.lock().await.editor.close();
        if closed {
            self.emit(ScreenEvent::EditorClosed);
        }
        closed
    }

    /// Validates the open session and sends the update.
    ///
    /// Validation failures never reach the backend. While a submit for the
    /// open session is in flight, further calls return
    /// [`SubmitOutcome::AlreadySubmitting`].
    pub async fn submit(&self) -> SubmitOutcome {
        let pending = match self.inner.lock().await.editor.begin_submit() {
            Ok(pending) => pending,
            Err(SubmitRejected::NotOpen) => return SubmitOutcome::NotOpen,
            Err(SubmitRejected::AlreadySubmitting) => {
                debug!(screen = K::NAME, "submit already in flight; ignoring");
                return SubmitOutcome::AlreadySubmitting;
            }
            Err(SubmitRejected::Invalid(errors)) => {
                debug!(screen = K::NAME, errors = %errors, "edit form rejected");
                self.emit(ScreenEvent::ValidationFailed(errors.clone()));
                return SubmitOutcome::Invalid(errors);
            }
        };
        self.emit(ScreenEvent::SubmitPending(true));

        let result = self
            .kind
            .update(self.backend.as_ref(), pending.target, &pending.request)
            .await;

        match result {
            Ok(updated) => {
                info!(screen = K::NAME, record_id = %pending.target, "record updated");
                let refetch = {
                    let mut state = self.inner.lock().await;
                    let refetch = match (K::RECONCILIATION, updated) {
                        (Reconciliation::Patch, Some(record)) => {
                            let target = pending.target;
                            let was_loading = state.list.loading();
                            let returned = record.id();
                            if state.list.patch(target, record) {
                                self.emit(ScreenEvent::RecordPatched(target));
                                if was_loading {
                                    self.emit(ScreenEvent::LoadingChanged(false));
                                }
                                false
                            } else if returned != target {
                                warn!(
                                    screen = K::NAME,
                                    record_id = %target,
                                    returned_id = %returned,
                                    "update returned a different record; refetching"
                                );
                                true
                            } else {
                                debug!(
                                    screen = K::NAME,
                                    record_id = %target,
                                    "updated record no longer listed"
                                );
                                false
                            }
                        }
                        (Reconciliation::Patch, None) => {
                            debug!(screen = K::NAME, "update returned no record; refetching");
                            true
                        }
                        (Reconciliation::Refetch, _) => true,
                    };
                    if state.editor.settle_success(pending.token) {
                        self.emit(ScreenEvent::EditorClosed);
                    }
                    refetch
                };
                self.emit(ScreenEvent::SubmitPending(false));
                self.notifier
                    .notify(NotificationKind::Success, K::MESSAGES.update_succeeded);
                if refetch {
                    self.refresh().await;
                }
                SubmitOutcome::Saved
            }
            Err(err) => {
                warn!(screen = K::NAME, record_id = %pending.target, error = %err, "update failed");
                self.inner.lock().await.editor.settle_failure(pending.token);
                self.emit(ScreenEvent::SubmitPending(false));
                let message = err
                    .backend_message()
                    .unwrap_or(K::MESSAGES.update_failed)
                    .to_string();
                self.notifier.notify(NotificationKind::Error, &message);
                SubmitOutcome::Failed { message }
            }
        }
    }
}

impl<K: DeletableKind> AdminScreen<K> {
    /// Deletes a record after an explicit yes from the confirmer, then
    /// refetches the collection.
    pub async fn delete(&self, id: IdOf<K>) -> DeleteOutcome {
        let record = self.inner.lock().await.list.get(id).cloned();
        let prompt = self.kind.delete_prompt(record.as_ref());
        if !self.confirmer.confirm(&prompt).await {
            info!(screen = K::NAME, record_id = %id, "delete declined");
            return DeleteOutcome::Declined;
        }

        match self.kind.delete(self.backend.as_ref(), id).await {
            Ok(()) => {
                info!(screen = K::NAME, record_id = %id, "record deleted");
                {
                    let mut state = self.inner.lock().await;
                    let was_loading = state.list.loading();
                    if state.list.remove(id).is_some() {
                        self.emit(ScreenEvent::RecordRemoved(id));
                        if was_loading {
                            self.emit(ScreenEvent::LoadingChanged(false));
                        }
                    }
                    let editing_deleted = state
                        .editor
                        .active()
                        .is_some_and(|active| active.target() == id);
                    if editing_deleted && state.editor.close() {
                        self.emit(ScreenEvent::EditorClosed);
                    }
                }
                self.notifier
                    .notify(NotificationKind::Success, K::DELETE_MESSAGES.succeeded);
                self.refresh().await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                warn!(screen = K::NAME, record_id = %id, error = %err, "delete failed");
                let message = err
                    .backend_message()
                    .unwrap_or(K::DELETE_MESSAGES.failed)
                    .to_string();
                self.notifier.notify(NotificationKind::Error, &message);
                DeleteOutcome::Failed { message }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/screen_tests.rs"]
mod tests;
