// src/web/mod.rs
//
// HTTP-поверхность: axum-роутер, общее состояние и запуск сервера.

pub mod handlers;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use log::info;
use tokio::net::TcpListener;
use tokio::signal;

use crate::config::Config;
use crate::db::ContactRepo;
use crate::notify::Notifier;

/// Состояние, раздаваемое обработчикам. Конфигурация построена один раз
/// на старте; внутри запросов глобальное окружение не читается.
#[derive(Clone)]
pub struct AppState {
    pub repo: ContactRepo,
    pub config: Arc<Config>,
    pub notifier: Option<Arc<dyn Notifier>>,
}

/// Собирает роутер целиком: страница, CRUD, экспорт, бэкап.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/contacts",
            get(handlers::list_contacts).post(handlers::create_contact),
        )
        .route(
            "/api/contacts/:id",
            axum::routing::put(handlers::update_contact).delete(handlers::delete_contact),
        )
        .route("/api/export/csv", get(handlers::export_csv))
        .route("/api/export/json", get(handlers::export_json))
        .route("/api/export", get(handlers::export_xlsx))
        .route("/api/backup", get(handlers::backup))
        .with_state(state)
}

/// Запускает сервер и держит его до Ctrl+C / SIGTERM.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.bind_addr.clone();
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("справочник слушает на {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("сервер остановлен");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("не удалось установить обработчик Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("не удалось установить обработчик SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
