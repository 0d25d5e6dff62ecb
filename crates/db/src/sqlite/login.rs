//! SQLite-Implementierung des LoginRepository (transaktionale Schreibvorgaenge)

use werkhof_core::{OwnerTyp, UserId};

use crate::models::{BenutzerMitNamespace, LoginErgebnis, NeueSession, NeuerBenutzer, NeuerNamespace};
use crate::repository::{DbResult, LoginRepository};
use crate::sqlite::namespaces::{
    namespace_einfuegen, namespace_nach_owner, namespace_von_geloeschtem_uebernehmen,
};
use crate::sqlite::pool::SqliteDb;
use crate::sqlite::sessions::session_einfuegen;
use crate::sqlite::users::{benutzer_einfuegen, login_aktualisieren, namespace_setzen};

impl LoginRepository for SqliteDb {
    async fn login_festschreiben(
        &self,
        user_id: UserId,
        client_ip: &str,
        session: NeueSession<'_>,
    ) -> DbResult<LoginErgebnis> {
        // Ein vorzeitiges `?` verwirft `tx` und rollt damit alles zurueck
        let mut tx = self.pool.begin().await?;

        login_aktualisieren(&mut tx, &self.tabellen, user_id, client_ip).await?;
        let session = session_einfuegen(&mut tx, &self.tabellen, &session).await?;
        let namespace =
            namespace_nach_owner(&mut tx, &self.tabellen, user_id.inner(), OwnerTyp::Benutzer)
                .await?;

        tx.commit().await?;

        Ok(LoginErgebnis { session, namespace })
    }

    async fn registrierung_festschreiben(
        &self,
        benutzer: NeuerBenutzer<'_>,
        namespace_path: &str,
    ) -> DbResult<BenutzerMitNamespace> {
        let mut tx = self.pool.begin().await?;

        let mut record = benutzer_einfuegen(&mut tx, &self.tabellen, &benutzer).await?;

        // Pfade geloeschter Benutzer sind wieder frei, wie ihre Namen
        let uebernommen = namespace_von_geloeschtem_uebernehmen(
            &mut tx,
            &self.tabellen,
            namespace_path,
            record.id.inner(),
        )
        .await?;
        let namespace = match uebernommen {
            Some(ns) => ns,
            None => {
                namespace_einfuegen(
                    &mut tx,
                    &self.tabellen,
                    &NeuerNamespace {
                        owner_id: record.id.inner(),
                        owner_typ: OwnerTyp::Benutzer,
                        path: namespace_path,
                    },
                )
                .await?
            }
        };
        namespace_setzen(&mut tx, &self.tabellen, record.id, namespace.id).await?;

        tx.commit().await?;

        record.namespace_id = Some(namespace.id);
        Ok(BenutzerMitNamespace {
            benutzer: record,
            namespace: Some(namespace),
        })
    }
}
