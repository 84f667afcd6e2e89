// src/config.rs
//
// Конфигурация читается один раз на старте процесса и передаётся
// по ссылке (Arc) в состояние сервера. Внутри обработчиков переменные
// окружения не читаются.

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};
use log::warn;

/// Настройки процесса: путь к базе, адрес, пароль администратора
/// и (опционально) SMTP для рассылки резервных копий.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub bind_addr: String,
    pub admin_password: String,
    pub smtp: Option<SmtpConfig>,
}

/// Реквизиты исходящей почты. Бэкап отправляется только если
/// заданы все пять переменных.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub to: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let db_path = env::var("PHONEBOOK_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("krasunit_phonebook.db"));

        let bind_addr =
            env::var("PHONEBOOK_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        // Пароль без значения по умолчанию: вшитый в код пароль это дыра,
        // поэтому без переменной окружения процесс не стартует.
        let Ok(admin_password) = env::var("PHONEBOOK_ADMIN_PASSWORD") else {
            bail!("PHONEBOOK_ADMIN_PASSWORD не задан, пароль администратора обязателен");
        };
        if admin_password.is_empty() {
            bail!("PHONEBOOK_ADMIN_PASSWORD пуст");
        }

        Ok(Self {
            db_path,
            bind_addr,
            admin_password,
            smtp: SmtpConfig::from_env()?,
        })
    }
}

impl SmtpConfig {
    fn from_env() -> anyhow::Result<Option<Self>> {
        let host = env::var("SMTP_HOST").ok();
        let port = env::var("SMTP_PORT").ok();
        let user = env::var("SMTP_USER").ok();
        let password = env::var("SMTP_PASSWORD").ok();
        let to = env::var("BACKUP_EMAIL_TO").ok();

        match (host, port, user, password, to) {
            (Some(host), Some(port), Some(user), Some(password), Some(to)) => {
                let port: u16 = port.parse().context("SMTP_PORT должен быть числом")?;
                Ok(Some(Self { host, port, user, password, to }))
            }
            (None, None, None, None, None) => Ok(None),
            _ => {
                warn!("SMTP настроен не полностью, отправка бэкапов отключена");
                Ok(None)
            }
        }
    }
}
