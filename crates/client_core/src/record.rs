use std::fmt::{Debug, Display};
use std::hash::Hash;

use shared::{
    domain::{SpecialtyId, UserId},
    protocol::{SpecialtySummary, UserSummary},
};

/// A backend-owned row shown by an admin screen.
///
/// Identity is the backend-assigned id; two records with the same id are the
/// same row even when their fields differ.
pub trait AdminRecord: Clone + Debug + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static;

    fn id(&self) -> Self::Id;
    fn display_name(&self) -> &str;
}

impl AdminRecord for SpecialtySummary {
    type Id = SpecialtyId;

    fn id(&self) -> SpecialtyId {
        self.especialidade_id
    }

    fn display_name(&self) -> &str {
        &self.especialidade_nome
    }
}

impl AdminRecord for UserSummary {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.usuario_id
    }

    fn display_name(&self) -> &str {
        &self.usuario_nome
    }
}
