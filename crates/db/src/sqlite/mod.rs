//! SQLite-Backend-Implementierungen fuer alle Repository-Traits

pub(crate) mod filter;
pub mod login;
pub mod namespaces;
pub mod pool;
pub mod sessions;
pub mod users;

pub use pool::SqliteDb;
