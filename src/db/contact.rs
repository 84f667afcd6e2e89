// src/db/contact.rs

use std::path::Path;

use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::Connection;

use crate::error::AppError;
use crate::search;

/// Организация по умолчанию: подставляется, если поле пришло пустым.
pub const DEFAULT_ORGANIZATION: &str = "КрасЮнит";

/// Запись справочника. Телефон хранится как пришёл, форматирование
/// `+7 (XXX) XXX-XX-XX` делает клиент.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub organization: String,
    pub position: String,
    pub email: String,
    pub address: String,
    pub notes: String,
    pub telegram: String,
}

/// Входные данные для создания/обновления (тело POST и PUT).
/// Все поля со значением по умолчанию, чтобы неполный JSON
/// не валил десериализацию; проверка обязательных полей своя.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub telegram: String,
}

impl ContactInput {
    /// Имя, телефон и должность обязательны. Сообщение перечисляет
    /// все пропущенные поля разом, как их показывает страница.
    fn validate(&self) -> Result<(), AppError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("Имя");
        }
        if self.phone.trim().is_empty() {
            missing.push("Телефон");
        }
        if self.position.trim().is_empty() {
            missing.push("Должность");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(missing.join(", ")))
        }
    }

    fn organization(&self) -> &str {
        let org = self.organization.trim();
        if org.is_empty() {
            DEFAULT_ORGANIZATION
        } else {
            org
        }
    }
}

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    phone TEXT NOT NULL,
    organization TEXT NOT NULL,
    position TEXT NOT NULL,
    email TEXT NOT NULL DEFAULT '',
    address TEXT NOT NULL DEFAULT '',
    notes TEXT NOT NULL DEFAULT '',
    telegram TEXT NOT NULL DEFAULT ''
)
"#;

const SELECT_COLUMNS: &str =
    "id, name, phone, organization, position, email, address, notes, telegram";

fn contact_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        organization: row.get(3)?,
        position: row.get(4)?,
        email: row.get(5)?,
        address: row.get(6)?,
        notes: row.get(7)?,
        telegram: row.get(8)?,
    })
}

/// Репозиторий контактов. Владеет единственным соединением на процесс
/// (tokio-rusqlite гоняет запросы через свой фоновый поток, так что
/// конкурентные записи сериализуются сами собой).
#[derive(Clone)]
pub struct ContactRepo {
    conn: Connection,
}

impl ContactRepo {
    pub async fn open(path: &Path) -> Result<Self, AppError> {
        let conn = Connection::open(path).await?;
        Self::init(conn).await
    }

    /// База в памяти, для тестов.
    pub async fn open_in_memory() -> Result<Self, AppError> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, AppError> {
        conn.call(|conn| {
            conn.execute(CREATE_TABLE_SQL, [])?;
            Ok(())
        })
        .await?;
        Ok(Self { conn })
    }

    /// Вставляет запись и возвращает присвоенный id.
    pub async fn create(&self, input: ContactInput) -> Result<i64, AppError> {
        input.validate()?;
        let organization = input.organization().to_string();
        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO contacts
                        (name, phone, organization, position, email, address, notes, telegram)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    "#,
                    params![
                        input.name.trim(),
                        input.phone.trim(),
                        organization,
                        input.position.trim(),
                        input.email.trim(),
                        input.address.trim(),
                        input.notes.trim(),
                        input.telegram.trim(),
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(id)
    }

    /// Все записи в порядке вставки.
    pub async fn list(&self) -> Result<Vec<Contact>, AppError> {
        let contacts = self
            .conn
            .call(|conn| {
                let sql = format!("SELECT {SELECT_COLUMNS} FROM contacts ORDER BY id");
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], contact_from_row)?;
                let mut out = Vec::new();
                for row in rows {
                    out.push(row?);
                }
                Ok(out)
            })
            .await?;
        Ok(contacts)
    }

    /// Поиск по подстроке без учёта регистра (включая кириллицу),
    /// см. `search::filter`. Пустой запрос возвращает полный список.
    pub async fn search(&self, term: &str) -> Result<Vec<Contact>, AppError> {
        Ok(search::filter(self.list().await?, term))
    }

    pub async fn get(&self, id: i64) -> Result<Contact, AppError> {
        let found = self
            .conn
            .call(move |conn| {
                let sql = format!("SELECT {SELECT_COLUMNS} FROM contacts WHERE id = ?1");
                let contact = conn
                    .query_row(&sql, params![id], contact_from_row)
                    .optional()?;
                Ok(contact)
            })
            .await?;
        found.ok_or(AppError::NotFound(id))
    }

    /// Полная замена всех изменяемых полей. Отсутствующий id считается ошибкой,
    /// а не тихий no-op.
    pub async fn update(&self, id: i64, input: ContactInput) -> Result<(), AppError> {
        input.validate()?;
        let organization = input.organization().to_string();
        let affected = self
            .conn
            .call(move |conn| {
                let n = conn.execute(
                    r#"
                    UPDATE contacts
                    SET name = ?1, phone = ?2, organization = ?3, position = ?4,
                        email = ?5, address = ?6, notes = ?7, telegram = ?8
                    WHERE id = ?9
                    "#,
                    params![
                        input.name.trim(),
                        input.phone.trim(),
                        organization,
                        input.position.trim(),
                        input.email.trim(),
                        input.address.trim(),
                        input.notes.trim(),
                        input.telegram.trim(),
                        id,
                    ],
                )?;
                Ok(n)
            })
            .await?;
        if affected == 0 {
            return Err(AppError::NotFound(id));
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let affected = self
            .conn
            .call(move |conn| {
                let n = conn.execute("DELETE FROM contacts WHERE id = ?1", params![id])?;
                Ok(n)
            })
            .await?;
        if affected == 0 {
            return Err(AppError::NotFound(id));
        }
        Ok(())
    }
}
