use std::fmt::Debug;

use crate::{record::AdminRecord, validation::ValidationErrors};

/// Working copy of a record's editable fields.
pub trait EditForm: Clone + Debug + PartialEq + Send + Sync + 'static {
    type Record: AdminRecord;
    /// Write model sent to the backend once the form validates.
    type Request: Clone + Debug + Send + Sync + 'static;

    fn from_record(record: &Self::Record) -> Self;
    fn validate(&self) -> Result<Self::Request, ValidationErrors>;
}

/// Identifies one opened session, so a submit that settles late cannot
/// close or reopen a session the user opened afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Closed,
    Open,
    Submitting,
}

#[derive(Debug, Clone)]
pub struct ActiveEdit<F: EditForm> {
    token: SessionToken,
    target: <F::Record as AdminRecord>::Id,
    target_name: String,
    values: F,
    submitting: bool,
    errors: ValidationErrors,
}

impl<F: EditForm> ActiveEdit<F> {
    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn target(&self) -> <F::Record as AdminRecord>::Id {
        self.target
    }

    /// Name of the record as it was when the panel opened.
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn values(&self) -> &F {
        &self.values
    }

    pub fn submitting(&self) -> bool {
        self.submitting
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }
}

#[derive(Debug, Clone)]
pub struct PendingSubmit<F: EditForm> {
    pub token: SessionToken,
    pub target: <F::Record as AdminRecord>::Id,
    pub request: F::Request,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejected {
    NotOpen,
    AlreadySubmitting,
    Invalid(ValidationErrors),
}

#[derive(Debug, Clone)]
pub struct EditSession<F: EditForm> {
    active: Option<ActiveEdit<F>>,
    next_token: u64,
}

impl<F: EditForm> Default for EditSession<F> {
    fn default() -> Self {
        Self {
            active: None,
            next_token: 0,
        }
    }
}

impl<F: EditForm> EditSession<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditState {
        match &self.active {
            None => EditState::Closed,
            Some(active) if active.submitting => EditState::Submitting,
            Some(_) => EditState::Open,
        }
    }

    pub fn active(&self) -> Option<&ActiveEdit<F>> {
        self.active.as_ref()
    }

    /// Opens a session prefilled from `record`, discarding any session that
    /// was already open. Returns `None`, leaving the session untouched,
    /// while a submit is in flight.
    pub fn open(&mut self, record: &F::Record) -> Option<SessionToken> {
        if self.state() == EditState::Submitting {
            return None;
        }
        self.next_token += 1;
        let token = SessionToken(self.next_token);
        self.active = Some(ActiveEdit {
            token,
            target: record.id(),
            target_name: record.display_name().to_string(),
            values: F::from_record(record),
            submitting: false,
            errors: ValidationErrors::new(),
        });
        Some(token)
    }

    pub fn close(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// Applies form input. Field errors from a previous attempt are cleared.
    pub fn update(&mut self, edit: impl FnOnce(&mut F)) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        edit(&mut active.values);
        active.errors = ValidationErrors::new();
        true
    }

    pub fn begin_submit(&mut self) -> Result<PendingSubmit<F>, SubmitRejected> {
        let active = self.active.as_mut().ok_or(SubmitRejected::NotOpen)?;
        if active.submitting {
            return Err(SubmitRejected::AlreadySubmitting);
        }

        match active.values.validate() {
            Ok(request) => {
                active.errors = ValidationErrors::new();
                active.submitting = true;
                Ok(PendingSubmit {
                    token: active.token,
                    target: active.target,
                    request,
                })
            }
            Err(errors) => {
                active.errors = errors.clone();
                Err(SubmitRejected::Invalid(errors))
            }
        }
    }

    /// Returns the session to `Open` with its values intact. No-op when the
    /// session behind `token` is gone.
    pub fn settle_failure(&mut self, token: SessionToken) -> bool {
        match self.active.as_mut() {
            Some(active) if active.token == token => {
                active.submitting = false;
                true
            }
            _ => false,
        }
    }

    /// Closes the session behind `token`, if it is still the open one.
    pub fn settle_success(&mut self, token: SessionToken) -> bool {
        match &self.active {
            Some(active) if active.token == token => {
                self.active = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/edit_session_tests.rs"]
mod tests;
