// src/error.rs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use thiserror::Error;

/// Ошибки приложения. Клиентские варианты (валидация, авторизация,
/// отсутствующая запись) возвращаются в ответе как есть, внутренние
/// подробности наружу не утекают, только в лог.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Заполните обязательные поля: {0}")]
    Validation(String),

    // Один и тот же ответ для неверного и для отсутствующего пароля
    #[error("Доступ запрещён")]
    Forbidden,

    #[error("Контакт с id={0} не найден")]
    NotFound(i64),

    #[error("Ошибка базы данных: {0}")]
    Storage(#[from] tokio_rusqlite::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка экспорта CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Ошибка экспорта XLSX: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Ошибка сериализации: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_)
            | AppError::Io(_)
            | AppError::Csv(_)
            | AppError::Xlsx(_)
            | AppError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("внутренняя ошибка: {self}");
            "Внутренняя ошибка сервера".to_string()
        } else {
            self.to_string()
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
