//! Wire shapes exchanged with the admin backend.
//!
//! Read models (list/update responses) and write models (update request
//! bodies) are distinct types: the user update endpoint takes `nome`/`email`
//! while the list endpoint returns `usuario_nome`/`usuario_email`.

use serde::{Deserialize, Serialize};

use crate::domain::{SpecialtyId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialtySummary {
    pub especialidade_id: SpecialtyId,
    pub especialidade_nome: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSpecialtyRequest {
    pub especialidade_nome: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub usuario_id: UserId,
    pub usuario_nome: String,
    pub usuario_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub nome: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_list_entry_uses_prefixed_field_names() {
        let user: UserSummary = serde_json::from_str(
            r#"{"usuario_id":7,"usuario_nome":"Ana","usuario_email":"ana@clinica.com"}"#,
        )
        .expect("user");
        assert_eq!(user.usuario_id, UserId(7));
        assert_eq!(user.usuario_nome, "Ana");
    }

    #[test]
    fn user_update_uses_short_field_names() {
        let body = serde_json::to_value(UpdateUserRequest {
            nome: "Ana".into(),
            email: "ana@clinica.com".into(),
        })
        .expect("json");
        assert_eq!(
            body,
            serde_json::json!({"nome": "Ana", "email": "ana@clinica.com"})
        );
    }

    #[test]
    fn specialty_id_serializes_as_bare_number() {
        let body = serde_json::to_value(SpecialtySummary {
            especialidade_id: SpecialtyId(3),
            especialidade_nome: "Cardiologia".into(),
        })
        .expect("json");
        assert_eq!(body["especialidade_id"], 3);
    }
}
