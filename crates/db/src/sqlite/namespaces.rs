//! SQLite-Implementierung des NamespaceRepository

use sqlx::{Row, SqliteConnection};
use werkhof_core::{NamespaceId, OwnerTyp};

use crate::error::DbError;
use crate::models::{NamespaceRecord, NeuerNamespace};
use crate::repository::{DbResult, NamespaceRepository, Tabellennamen};
use crate::sqlite::filter::{geloeschter_benutzer, platzhalter, spalten};
use crate::sqlite::pool::SqliteDb;

const NAMESPACE_SPALTEN: [&str; 4] = ["id", "owner_id", "owner_type", "path"];

impl NamespaceRepository for SqliteDb {
    async fn create(&self, data: NeuerNamespace<'_>) -> DbResult<NamespaceRecord> {
        let mut conn = self.pool.acquire().await?;
        namespace_einfuegen(&mut conn, &self.tabellen, &data).await
    }

    async fn get(&self, id: NamespaceId) -> DbResult<Option<NamespaceRecord>> {
        let n = self.tabellen.namespace_q();
        let sql = format!(
            "SELECT {} FROM {n} WHERE {n}.id = ?",
            spalten(&n, &NAMESPACE_SPALTEN)
        );

        let row = sqlx::query(&sql)
            .bind(id.inner())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_namespace(&r)).transpose()
    }

    async fn get_by_owner(
        &self,
        owner_id: i64,
        owner_typ: OwnerTyp,
    ) -> DbResult<Option<NamespaceRecord>> {
        let mut conn = self.pool.acquire().await?;
        namespace_nach_owner(&mut conn, &self.tabellen, owner_id, owner_typ).await
    }

    async fn list_by_owners(
        &self,
        owner_typ: OwnerTyp,
        owner_ids: &[i64],
    ) -> DbResult<Vec<NamespaceRecord>> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }

        let n = self.tabellen.namespace_q();
        let sql = format!(
            "SELECT {} FROM {n} WHERE {n}.owner_type = ? AND {n}.owner_id IN ({})",
            spalten(&n, &NAMESPACE_SPALTEN),
            platzhalter(owner_ids.len()),
        );

        let mut q = sqlx::query(&sql).bind(owner_typ.als_i64());
        for id in owner_ids {
            q = q.bind(*id);
        }

        let rows = q.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_namespace).collect()
    }
}

pub(crate) async fn namespace_einfuegen(
    conn: &mut SqliteConnection,
    t: &Tabellennamen,
    data: &NeuerNamespace<'_>,
) -> DbResult<NamespaceRecord> {
    let sql = format!(
        "INSERT INTO {} (owner_id, owner_type, path) VALUES (?, ?, ?)",
        t.namespace_q()
    );

    let id = sqlx::query(&sql)
        .bind(data.owner_id)
        .bind(data.owner_typ.als_i64())
        .bind(data.path)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            DbError::aus_sqlx(e, || {
                format!("Namespace '{}' oder Owner {} bereits vergeben", data.path, data.owner_id)
            })
        })?
        .last_insert_rowid();

    Ok(NamespaceRecord {
        id: NamespaceId(id),
        owner_id: data.owner_id,
        owner_typ: data.owner_typ,
        path: data.path.to_string(),
    })
}

pub(crate) async fn namespace_nach_owner(
    conn: &mut SqliteConnection,
    t: &Tabellennamen,
    owner_id: i64,
    owner_typ: OwnerTyp,
) -> DbResult<Option<NamespaceRecord>> {
    let n = t.namespace_q();
    let sql = format!(
        "SELECT {} FROM {n} WHERE {n}.owner_id = ? AND {n}.owner_type = ?",
        spalten(&n, &NAMESPACE_SPALTEN)
    );

    let row = sqlx::query(&sql)
        .bind(owner_id)
        .bind(owner_typ.als_i64())
        .fetch_optional(&mut *conn)
        .await?;

    row.map(|r| row_to_namespace(&r)).transpose()
}

/// Uebernimmt den Benutzer-Namespace `path`, falls er einem weich geloeschten
/// Benutzer gehoert. `None`, wenn es nichts zu uebernehmen gibt.
pub(crate) async fn namespace_von_geloeschtem_uebernehmen(
    conn: &mut SqliteConnection,
    t: &Tabellennamen,
    path: &str,
    neuer_owner: i64,
) -> DbResult<Option<NamespaceRecord>> {
    let n = t.namespace_q();
    let b = t.benutzer_q();
    let sql = format!(
        "UPDATE {n} SET owner_id = ?
         WHERE {n}.path = ? AND {n}.owner_type = ?
           AND {n}.owner_id IN (SELECT {b}.id FROM {b} WHERE {})",
        geloeschter_benutzer(&b),
    );

    let affected = sqlx::query(&sql)
        .bind(neuer_owner)
        .bind(path)
        .bind(OwnerTyp::Benutzer.als_i64())
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            DbError::aus_sqlx(e, || format!("Benutzer {neuer_owner} hat bereits einen Namespace"))
        })?
        .rows_affected();

    if affected == 0 {
        return Ok(None);
    }

    let namespace = namespace_nach_owner(&mut *conn, t, neuer_owner, OwnerTyp::Benutzer).await?;

    if let Some(ns) = &namespace {
        // Geloeschte Konten verweisen nicht mehr auf den uebernommenen Namespace
        let sql = format!(
            "UPDATE {b} SET namespace_id = NULL WHERE namespace_id = ? AND {}",
            geloeschter_benutzer(&b),
        );
        sqlx::query(&sql)
            .bind(ns.id.inner())
            .execute(&mut *conn)
            .await?;

        tracing::info!(
            namespace_id = %ns.id,
            path = %ns.path,
            user_id = neuer_owner,
            "Namespace eines geloeschten Benutzers uebernommen"
        );
    }

    Ok(namespace)
}

fn row_to_namespace(row: &sqlx::sqlite::SqliteRow) -> DbResult<NamespaceRecord> {
    let owner_type: i64 = row.try_get("owner_type")?;
    let owner_typ = OwnerTyp::try_from(owner_type).map_err(DbError::intern)?;

    Ok(NamespaceRecord {
        id: NamespaceId(row.try_get("id")?),
        owner_id: row.try_get("owner_id")?,
        owner_typ,
        path: row.try_get("path")?,
    })
}
