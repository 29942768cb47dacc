use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use client_core::{
    AdminBackend, ConfirmPrompt, Confirmer, DeleteOutcome, EditState, FetchOutcome,
    HttpAdminClient, NotificationKind, Notifier, SpecialtyScreen, SubmitOutcome, UserScreen,
};
use serde_json::{json, Value};
use shared::domain::{SpecialtyId, UserId};
use tokio::net::TcpListener;

#[derive(Clone)]
struct Clinic {
    specialties: Arc<Mutex<Vec<(i64, String)>>>,
    users: Arc<Mutex<Vec<(i64, String, String)>>>,
}

impl Clinic {
    fn seeded() -> Self {
        Self {
            specialties: Arc::new(Mutex::new(vec![
                (1, "Cardiologia".into()),
                (2, "Neurologia".into()),
            ])),
            users: Arc::new(Mutex::new(vec![
                (1, "Ana Souza".into(), "ana@clinica.com".into()),
                (5, "Bruno Lima".into(), "bruno@clinica.com".into()),
                (8, "Carla Dias".into(), "carla@clinica.com".into()),
            ])),
        }
    }
}

async fn list_specialties(State(clinic): State<Clinic>) -> Json<Value> {
    let rows = clinic.specialties.lock().unwrap().clone();
    Json(Value::Array(
        rows.into_iter()
            .map(|(id, name)| json!({"especialidade_id": id, "especialidade_nome": name}))
            .collect(),
    ))
}

async fn update_specialty(
    State(clinic): State<Clinic>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let name = body["especialidade_nome"].as_str().unwrap_or_default().to_string();
    let mut rows = clinic.specialties.lock().unwrap();
    let row = rows.iter_mut().find(|(row_id, _)| *row_id == id).ok_or((
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Especialidade não encontrada"})),
    ))?;
    row.1 = name.clone();
    Ok(Json(json!({"especialidade_id": id, "especialidade_nome": name})))
}

async fn list_users(State(clinic): State<Clinic>) -> Json<Value> {
    let rows = clinic.users.lock().unwrap().clone();
    Json(Value::Array(
        rows.into_iter()
            .map(|(id, name, email)| {
                json!({"usuario_id": id, "usuario_nome": name, "usuario_email": email})
            })
            .collect(),
    ))
}

async fn update_user(
    State(clinic): State<Clinic>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let mut rows = clinic.users.lock().unwrap();
    if rows.iter().any(|(row_id, _, row_email)| *row_id != id && *row_email == email) {
        return (
            StatusCode::CONFLICT,
            Json(json!({"error": "E-mail já cadastrado"})),
        );
    }
    if let Some(row) = rows.iter_mut().find(|(row_id, _, _)| *row_id == id) {
        row.1 = body["nome"].as_str().unwrap_or_default().to_string();
        row.2 = email;
    }
    (StatusCode::OK, Json(json!({"message": "ok"})))
}

async fn delete_user(State(clinic): State<Clinic>, Path(id): Path<i64>) -> StatusCode {
    clinic.users.lock().unwrap().retain(|(row_id, _, _)| *row_id != id);
    StatusCode::NO_CONTENT
}

async fn spawn_clinic(clinic: Clinic) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let app = Router::new()
        .route("/especialidades", get(list_specialties))
        .route("/especialidades/:id", put(update_specialty))
        .route("/usuarios", get(list_users))
        .route("/usuarios/:id", put(update_user).delete(delete_user))
        .with_state(clinic);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[derive(Default)]
struct Notifications(Mutex<Vec<(NotificationKind, String)>>);

impl Notifier for Notifications {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.0.lock().unwrap().push((kind, message.to_string()));
    }
}

struct AlwaysYes;

#[async_trait]
impl Confirmer for AlwaysYes {
    async fn confirm(&self, _prompt: &ConfirmPrompt) -> bool {
        true
    }
}

#[tokio::test]
async fn specialty_rename_round_trip() {
    let clinic = Clinic::seeded();
    let server_url = spawn_clinic(clinic.clone()).await;
    let backend: Arc<dyn AdminBackend> =
        Arc::new(HttpAdminClient::new(&server_url).expect("client"));
    let notifications = Arc::new(Notifications::default());
    let screen = SpecialtyScreen::specialties(backend, notifications.clone());

    assert_eq!(screen.activate().await, FetchOutcome::Committed { count: 2 });
    screen.open_editor(SpecialtyId(2)).await.expect("open");
    screen
        .update_form(|form| form.name = "Neuro-Oncologia".into())
        .await
        .expect("edit");

    assert_eq!(screen.submit().await, SubmitOutcome::Saved);

    let names: Vec<_> = screen
        .records()
        .await
        .into_iter()
        .map(|s| s.especialidade_nome)
        .collect();
    assert_eq!(names, vec!["Cardiologia", "Neuro-Oncologia"]);
    assert_eq!(clinic.specialties.lock().unwrap()[1].1, "Neuro-Oncologia");
    assert_eq!(screen.editor_state().await, EditState::Closed);
}

#[tokio::test]
async fn user_edit_conflict_then_delete() {
    let clinic = Clinic::seeded();
    let server_url = spawn_clinic(clinic.clone()).await;
    let backend: Arc<dyn AdminBackend> =
        Arc::new(HttpAdminClient::new(&server_url).expect("client"));
    let notifications = Arc::new(Notifications::default());
    let screen = UserScreen::users(backend, notifications.clone(), Arc::new(AlwaysYes));

    assert_eq!(screen.activate().await, FetchOutcome::Committed { count: 3 });

    screen.open_editor(UserId(5)).await.expect("open");
    screen
        .update_form(|form| form.email = "ana@clinica.com".into())
        .await
        .expect("edit");
    assert_eq!(
        screen.submit().await,
        SubmitOutcome::Failed {
            message: "E-mail já cadastrado".to_string()
        }
    );
    assert_eq!(screen.editor_state().await, EditState::Open);

    screen
        .update_form(|form| form.email = "bruno.lima@clinica.com".into())
        .await
        .expect("edit");
    assert_eq!(screen.submit().await, SubmitOutcome::Saved);
    assert_eq!(
        screen.records().await[1].usuario_email,
        "bruno.lima@clinica.com"
    );

    assert_eq!(screen.delete(UserId(5)).await, DeleteOutcome::Deleted);
    let ids: Vec<_> = screen
        .records()
        .await
        .into_iter()
        .map(|u| u.usuario_id)
        .collect();
    assert_eq!(ids, vec![UserId(1), UserId(8)]);

    let seen = notifications.0.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            (NotificationKind::Error, "E-mail já cadastrado".to_string()),
            (
                NotificationKind::Success,
                "Usuário atualizado com sucesso!".to_string()
            ),
            (
                NotificationKind::Success,
                "Usuário excluído com sucesso!".to_string()
            ),
        ]
    );
}
