//! Controllers for the specialty and user admin screens: a typed REST
//! client, per-screen list stores and edit sessions, and the collaborator
//! seams (notifications, confirmation) the UI plugs into.

pub mod client;
pub mod collaborators;
pub mod edit_session;
pub mod error;
pub mod list_store;
pub mod record;
pub mod screen;
pub mod specialties;
pub mod users;
pub mod validation;

pub use client::{AdminBackend, HttpAdminClient};
pub use collaborators::{
    ConfirmPrompt, Confirmer, MissingConfirmer, NotificationKind, Notifier, TracingNotifier,
};
pub use edit_session::{EditForm, EditState};
pub use error::ClientError;
pub use record::AdminRecord;
pub use screen::{
    AdminScreen, DeleteOutcome, EditorError, FetchOutcome, ScreenEvent, ScreenSnapshot,
    SubmitOutcome,
};
pub use specialties::{SpecialtyForm, SpecialtyScreen};
pub use users::{UserForm, UserScreen};
