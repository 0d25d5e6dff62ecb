//! Fehlertypen fuer den Auth-Service

use thiserror::Error;

/// Alle moeglichen Fehler im Auth-Service
///
/// `NichtGefunden` und `UngueltigerParameter` sind bewusst getrennt, damit
/// Clients "unbekanntes Konto" und "falsches Passwort" unterscheiden koennen.
/// Das verraet, ob ein Konto existiert.
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Login ---
    #[error("Benutzer nicht gefunden: {0}")]
    NichtGefunden(String),

    #[error("Zugriff verweigert: Benutzer ist nicht aktiviert")]
    ZugriffVerweigert,

    #[error("Ungueltiger Parameter: Passwort stimmt nicht ueberein")]
    UngueltigerParameter,

    // --- Registrierung ---
    #[error("Benutzername oder E-Mail bereits vergeben")]
    BereitsVergeben,

    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    // --- Session ---
    #[error("Session nicht gefunden oder abgelaufen")]
    SessionUngueltig,

    // --- Passwort ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    // --- Datenbank ---
    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] werkhof_db::DbError),
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthError>;
