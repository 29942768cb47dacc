use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::UserId,
    protocol::{UpdateUserRequest, UserSummary},
};

use crate::{
    client::AdminBackend,
    collaborators::{ConfirmPrompt, Confirmer, Notifier},
    edit_session::EditForm,
    error::ClientError,
    screen::{
        AdminScreen, DeletableKind, DeleteMessages, Reconciliation, ScreenKind, ScreenMessages,
    },
    validation::{email, min_chars, required, ValidationErrors},
};

pub const NAME_FIELD: &str = "usuario_nome";
pub const EMAIL_FIELD: &str = "usuario_email";
pub const MIN_NAME_CHARS: usize = 3;

const NAME_REQUIRED: &str = "Por favor insira o nome";
const NAME_TOO_SHORT: &str = "Mínimo 3 caracteres";
const EMAIL_REQUIRED: &str = "Por favor insira o e-mail";
const EMAIL_INVALID: &str = "E-mail inválido";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
}

impl EditForm for UserForm {
    type Record = UserSummary;
    type Request = UpdateUserRequest;

    fn from_record(record: &UserSummary) -> Self {
        Self {
            name: record.usuario_nome.clone(),
            email: record.usuario_email.clone(),
        }
    }

    fn validate(&self) -> Result<UpdateUserRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            NAME_FIELD,
            required(&self.name, NAME_REQUIRED)
                .and_then(|()| min_chars(&self.name, MIN_NAME_CHARS, NAME_TOO_SHORT)),
        );
        errors.check(
            EMAIL_FIELD,
            required(&self.email, EMAIL_REQUIRED)
                .and_then(|()| email(&self.email, EMAIL_INVALID)),
        );
        errors.into_result()?;

        Ok(UpdateUserRequest {
            nome: self.name.clone(),
            email: self.email.clone(),
        })
    }
}

/// User list screen. Every successful write is followed by a full refetch.
pub struct Users;

pub type UserScreen = AdminScreen<Users>;

#[async_trait]
impl ScreenKind for Users {
    type Form = UserForm;

    const NAME: &'static str = "usuarios";
    const RECONCILIATION: Reconciliation = Reconciliation::Refetch;
    const MESSAGES: ScreenMessages = ScreenMessages {
        list_failed: "Erro ao buscar usuários",
        update_succeeded: "Usuário atualizado com sucesso!",
        update_failed: "Erro ao atualizar usuário",
    };

    async fn list(&self, backend: &dyn AdminBackend) -> Result<Vec<UserSummary>, ClientError> {
        backend.list_users().await
    }

    async fn update(
        &self,
        backend: &dyn AdminBackend,
        id: UserId,
        request: &UpdateUserRequest,
    ) -> Result<Option<UserSummary>, ClientError> {
        backend.update_user(id, request).await?;
        Ok(None)
    }
}

#[async_trait]
impl DeletableKind for Users {
    const DELETE_MESSAGES: DeleteMessages = DeleteMessages {
        succeeded: "Usuário excluído com sucesso!",
        failed: "Erro ao excluir usuário",
    };

    fn delete_prompt(&self, _record: Option<&UserSummary>) -> ConfirmPrompt {
        ConfirmPrompt {
            title: "Confirmar exclusão".into(),
            body: "Tem certeza que deseja excluir este usuário?".into(),
            confirm_label: "Sim".into(),
            cancel_label: "Cancelar".into(),
        }
    }

    async fn delete(&self, backend: &dyn AdminBackend, id: UserId) -> Result<(), ClientError> {
        backend.delete_user(id).await
    }
}

impl AdminScreen<Users> {
    pub fn users(
        backend: Arc<dyn AdminBackend>,
        notifier: Arc<dyn Notifier>,
        confirmer: Arc<dyn Confirmer>,
    ) -> Self {
        Self::new(Users, backend, notifier).with_confirmer(confirmer)
    }
}
