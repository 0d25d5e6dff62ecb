//! Gemeinsame Identifikationstypen fuer Werkhof
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen. Die inneren Werte
//! entsprechen den Primaerschluesseln der Datenbank (`INTEGER PRIMARY KEY`).

use serde::{Deserialize, Serialize};

/// Eindeutige Benutzer-ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Gibt den inneren Datenbankschluessel zurueck
    pub fn inner(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

/// Eindeutige Namespace-ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceId(pub i64);

impl NamespaceId {
    /// Gibt den inneren Datenbankschluessel zurueck
    pub fn inner(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "namespace:{}", self.0)
    }
}

/// Art des Besitzers eines Namespaces
///
/// Wird in der Datenbank als Ganzzahl gespeichert (`owner_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerTyp {
    /// Namespace gehoert einem einzelnen Benutzer
    Benutzer,
    /// Namespace gehoert einer Organisation
    Organisation,
}

impl OwnerTyp {
    pub fn als_i64(&self) -> i64 {
        match self {
            Self::Benutzer => 1,
            Self::Organisation => 2,
        }
    }
}

impl TryFrom<i64> for OwnerTyp {
    type Error = String;

    fn try_from(wert: i64) -> std::result::Result<Self, Self::Error> {
        match wert {
            1 => Ok(Self::Benutzer),
            2 => Ok(Self::Organisation),
            other => Err(format!("Unbekannter Owner-Typ: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_display() {
        assert_eq!(UserId(42).to_string(), "user:42");
        assert_eq!(NamespaceId(7).to_string(), "namespace:7");
    }

    #[test]
    fn owner_typ_hin_und_zurueck() {
        assert_eq!(OwnerTyp::try_from(OwnerTyp::Benutzer.als_i64()), Ok(OwnerTyp::Benutzer));
        assert_eq!(
            OwnerTyp::try_from(OwnerTyp::Organisation.als_i64()),
            Ok(OwnerTyp::Organisation)
        );
        assert!(OwnerTyp::try_from(0).is_err());
    }

    #[test]
    fn ids_sind_serde_transparent() {
        let json = serde_json::to_string(&UserId(5)).unwrap();
        assert_eq!(json, "5");
        let uid: UserId = serde_json::from_str("5").unwrap();
        assert_eq!(uid, UserId(5));
    }
}
