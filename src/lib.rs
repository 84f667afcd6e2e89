// src/lib.rs
//
// Корпоративный справочник «КрасЮнит»: одна страница, таблица contacts
// в SQLite, экспорт в CSV/JSON/XLSX и резервная копия файла базы.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod notify;
pub mod search;
pub mod web;
