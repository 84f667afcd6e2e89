// src/db/mod.rs
//
// Слой хранения: одна таблица contacts в SQLite. Обработчики напрямую
// с соединением не работают, только через ContactRepo.

pub mod contact;

pub use contact::{Contact, ContactInput, ContactRepo, DEFAULT_ORGANIZATION};
