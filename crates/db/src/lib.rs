//! werkhof-db – Datenbank-Schicht
//!
//! Dieses Crate stellt das Repository-Pattern fuer Benutzer, Sessions und
//! Namespaces bereit. Die SQLite-Implementierung (`SqliteDb`) erhaelt ihre
//! Tabellennamen explizit ueber `DatabaseConfig`; es gibt keinen
//! prozessweiten Zustand.

pub mod anreicherung;
pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use anreicherung::namespaces_zusammenfuehren;
pub use error::DbError;
pub use repository::{
    DatabaseConfig, DbResult, LoginRepository, NamespaceRepository, SessionRepository,
    Tabellennamen, UserRepository,
};
pub use sqlite::SqliteDb;
