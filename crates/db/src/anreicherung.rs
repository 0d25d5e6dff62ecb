//! Namespace-Anreicherung fuer Benutzerlisten
//!
//! Die Namespaces einer ganzen Benutzerliste werden mit einer einzigen
//! Abfrage geladen (siehe `NamespaceRepository::list_by_owners`) und hier
//! per Owner-ID zugeordnet. Die Eingabe wird nicht veraendert; das Ergebnis
//! ist eine neue, zusammengesetzte Sicht.

use std::collections::HashMap;

use crate::models::{BenutzerMitNamespace, BenutzerRecord, NamespaceRecord};

/// Ordnet jedem Benutzer seinen Namespace (Owner-ID == Benutzer-ID) zu.
///
/// Die Reihenfolge der Benutzer bleibt erhalten. Benutzer ohne passenden
/// Namespace erhalten `None`.
pub fn namespaces_zusammenfuehren(
    benutzer: Vec<BenutzerRecord>,
    namespaces: Vec<NamespaceRecord>,
) -> Vec<BenutzerMitNamespace> {
    let mut nach_owner: HashMap<i64, NamespaceRecord> = namespaces
        .into_iter()
        .map(|ns| (ns.owner_id, ns))
        .collect();

    benutzer
        .into_iter()
        .map(|b| {
            let namespace = nach_owner.remove(&b.id.inner());
            BenutzerMitNamespace {
                benutzer: b,
                namespace,
            }
        })
        .collect()
}

/// Owner-IDs einer Benutzerliste fuer die Bulk-Abfrage
pub fn owner_ids(benutzer: &[BenutzerRecord]) -> Vec<i64> {
    benutzer.iter().map(|b| b.id.inner()).collect()
}
