//! werkhof-auth – Login, Registrierung und Session-Ausgabe
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit Argon2id
//! - Session-Token-Erzeugung und Lebensdauer
//! - AuthService (Login, Registrierung, Aktivierung, Session-Pruefung)

pub mod error;
pub mod login;
pub mod password;
pub mod service;
pub mod session;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult};
pub use login::{Kennung, LoginAnfrage, LoginAntwort, Registrierung};
pub use password::{passwort_hashen, passwort_verifizieren};
pub use service::AuthService;
pub use session::{token_generieren, SessionRichtlinie};
