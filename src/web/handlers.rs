// src/web/handlers.rs

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::db::{Contact, ContactInput};
use crate::error::AppError;
use crate::export;
use crate::notify::spawn_backup;
use crate::web::AppState;

/// Заголовок, в котором клиент присылает пароль администратора.
pub const ADMIN_HEADER: &str = "x-admin-password";

/// Страница справочника, вшитая в бинарник.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

#[derive(Deserialize)]
pub struct ListQuery {
    q: Option<String>,
}

/// `GET /api/contacts[?q=term]`: список или поиск.
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Contact>>, AppError> {
    let contacts = match query.q.as_deref() {
        Some(term) => state.repo.search(term).await?,
        None => state.repo.list().await?,
    };
    Ok(Json(contacts))
}

/// `POST /api/contacts`: создание; пароль не требуется.
pub async fn create_contact(
    State(state): State<AppState>,
    Json(input): Json<ContactInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = state.repo.create(input).await?;
    spawn_backup(state.notifier.clone());
    Ok(Json(serde_json::json!({ "success": true, "id": id })))
}

/// `PUT /api/contacts/:id`: полная замена записи, только с паролем.
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(input): Json<ContactInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;
    state.repo.update(id, input).await?;
    spawn_backup(state.notifier.clone());
    Ok(Json(serde_json::json!({ "success": true })))
}

/// `DELETE /api/contacts/:id`: удаление, только с паролем.
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;
    state.repo.delete(id).await?;
    spawn_backup(state.notifier.clone());
    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn export_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    let contacts = state.repo.list().await?;
    let bytes = export::to_csv(&contacts)?;
    Ok(attachment(bytes, "text/csv; charset=utf-8", "contacts.csv"))
}

pub async fn export_json(State(state): State<AppState>) -> Result<Response, AppError> {
    let contacts = state.repo.list().await?;
    let bytes = export::to_json(&contacts)?;
    Ok(attachment(
        bytes,
        "application/json; charset=utf-8",
        "contacts.json",
    ))
}

pub async fn export_xlsx(State(state): State<AppState>) -> Result<Response, AppError> {
    let contacts = state.repo.list().await?;
    let bytes = export::to_xlsx(&contacts)?;
    Ok(attachment(
        bytes,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "contacts.xlsx",
    ))
}

/// `GET /api/backup`: файл базы как есть, целиком.
pub async fn backup(State(state): State<AppState>) -> Result<Response, AppError> {
    let bytes = tokio::fs::read(&state.config.db_path).await?;
    Ok(attachment(
        bytes,
        "application/octet-stream",
        "krasunit_phonebook.db",
    ))
}

/// Сверка пароля из заголовка с настроенным. Неверный и отсутствующий
/// пароль неразличимы для клиента.
fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    // Сравниваем байты: to_str() отверг бы пароль с кириллицей
    let supplied = headers
        .get(ADMIN_HEADER)
        .map(|v| v.as_bytes())
        .unwrap_or_default();
    if supplied == state.config.admin_password.as_bytes() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

fn attachment(bytes: Vec<u8>, content_type: &str, filename: &str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
