//! werkhof-core – Gemeinsame Typen und Fehlertypen
//!
//! Dieses Crate stellt die Bausteine bereit, die von allen anderen
//! Werkhof-Crates gemeinsam genutzt werden: ID-Newtypes, Besitzer-Typen
//! fuer Namespaces und den globalen Fehler-Enum.

pub mod error;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{Result, WerkhofError};
pub use types::{NamespaceId, OwnerTyp, UserId};
