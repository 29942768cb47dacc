use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::SpecialtyId,
    protocol::{SpecialtySummary, UpdateSpecialtyRequest},
};

use crate::{
    client::AdminBackend,
    collaborators::Notifier,
    edit_session::EditForm,
    error::ClientError,
    screen::{AdminScreen, Reconciliation, ScreenKind, ScreenMessages},
    validation::{required, ValidationErrors},
};

pub const NAME_FIELD: &str = "especialidade_nome";

const NAME_REQUIRED: &str = "Campo obrigatório";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialtyForm {
    pub name: String,
}

impl EditForm for SpecialtyForm {
    type Record = SpecialtySummary;
    type Request = UpdateSpecialtyRequest;

    fn from_record(record: &SpecialtySummary) -> Self {
        Self {
            name: record.especialidade_nome.clone(),
        }
    }

    fn validate(&self) -> Result<UpdateSpecialtyRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(NAME_FIELD, required(&self.name, NAME_REQUIRED));
        errors.into_result()?;

        Ok(UpdateSpecialtyRequest {
            especialidade_nome: self.name.clone(),
        })
    }
}

/// Specialty list screen. Updates are patched into the collection from the
/// backend's response; specialties cannot be deleted here.
pub struct Specialties;

pub type SpecialtyScreen = AdminScreen<Specialties>;

#[async_trait]
impl ScreenKind for Specialties {
    type Form = SpecialtyForm;

    const NAME: &'static str = "especialidades";
    const RECONCILIATION: Reconciliation = Reconciliation::Patch;
    const MESSAGES: ScreenMessages = ScreenMessages {
        list_failed: "Erro ao carregar especialidades",
        update_succeeded: "Especialidade atualizada com sucesso!",
        update_failed: "Erro ao atualizar",
    };

    async fn list(&self, backend: &dyn AdminBackend) -> Result<Vec<SpecialtySummary>, ClientError> {
        backend.list_specialties().await
    }

    async fn update(
        &self,
        backend: &dyn AdminBackend,
        id: SpecialtyId,
        request: &UpdateSpecialtyRequest,
    ) -> Result<Option<SpecialtySummary>, ClientError> {
        backend.update_specialty(id, request).await
    }
}

impl AdminScreen<Specialties> {
    pub fn specialties(backend: Arc<dyn AdminBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(Specialties, backend, notifier)
    }
}
