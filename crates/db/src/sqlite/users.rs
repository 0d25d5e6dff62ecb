//! SQLite-Implementierung des UserRepository

use chrono::Utc;
use sqlx::{Row, SqliteConnection};
use werkhof_core::{NamespaceId, OwnerTyp, UserId};

use crate::anreicherung::{namespaces_zusammenfuehren, owner_ids};
use crate::error::DbError;
use crate::models::{BenutzerMitNamespace, BenutzerRecord, NeuerBenutzer};
use crate::repository::{DbResult, NamespaceRepository, Tabellennamen, UserRepository};
use crate::sqlite::filter::{
    inaktiver_benutzer, normaler_benutzer, parse_datetime, parse_opt_datetime, spalten, zeit_text,
};
use crate::sqlite::pool::SqliteDb;

/// Spalten der Benutzer-Tabelle in Tabellenreihenfolge
pub(crate) const BENUTZER_SPALTEN: [&str; 14] = [
    "id",
    "email",
    "encrypted_password",
    "username",
    "name",
    "public_email",
    "created_at",
    "deleted_at",
    "verified_at",
    "last_login_at",
    "last_login_ip",
    "register_ip",
    "is_admin",
    "namespace_id",
];

impl UserRepository for SqliteDb {
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
        let mut conn = self.pool.acquire().await?;
        benutzer_einfuegen(&mut conn, &self.tabellen, &data).await
    }

    async fn get_by_id(&self, id: UserId) -> DbResult<Option<BenutzerRecord>> {
        self.benutzer_laden(Schluessel::Id(id)).await
    }

    async fn get_by_username(&self, username: &str) -> DbResult<Option<BenutzerRecord>> {
        self.benutzer_laden(Schluessel::Username(username)).await
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
        self.benutzer_laden(Schluessel::Email(email)).await
    }

    async fn exists_email_or_username(&self, username: &str, email: &str) -> DbResult<bool> {
        if !username.is_empty() && self.get_by_username(username).await?.is_some() {
            return Ok(true);
        }
        if !email.is_empty() && self.get_by_email(email).await?.is_some() {
            return Ok(true);
        }
        Ok(false)
    }

    async fn list_all(&self, page: u64, per: u64) -> DbResult<Vec<BenutzerRecord>> {
        // OFFSET waechst linear mit der Seitenzahl; bei sehr vielen Benutzern
        // waere Keyset-Pagination (WHERE id > ?) noetig.
        let b = self.tabellen.benutzer_q();
        let sql = format!(
            "SELECT {} FROM {b} WHERE {} ORDER BY {b}.id LIMIT ? OFFSET ?",
            spalten(&b, &BENUTZER_SPALTEN),
            normaler_benutzer(&b),
        );

        let limit = i64::try_from(per).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.saturating_mul(per)).unwrap_or(i64::MAX);

        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_benutzer).collect()
    }

    async fn list_admins(&self) -> DbResult<Vec<BenutzerMitNamespace>> {
        let b = self.tabellen.benutzer_q();
        let sql = format!(
            "SELECT {} FROM {b} WHERE {b}.is_admin = 1 AND {} ORDER BY {b}.id",
            spalten(&b, &BENUTZER_SPALTEN),
            normaler_benutzer(&b),
        );

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let admins = rows.iter().map(row_to_benutzer).collect::<DbResult<Vec<_>>>()?;

        let namespaces =
            NamespaceRepository::list_by_owners(self, OwnerTyp::Benutzer, &owner_ids(&admins))
                .await?;

        Ok(namespaces_zusammenfuehren(admins, namespaces))
    }

    async fn update_login(&self, id: UserId, client_ip: &str) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        login_aktualisieren(&mut conn, &self.tabellen, id, client_ip).await
    }

    async fn update_namespace(&self, id: UserId, namespace_id: NamespaceId) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        namespace_setzen(&mut conn, &self.tabellen, id, namespace_id).await
    }

    async fn activate(&self, id: UserId) -> DbResult<bool> {
        let b = self.tabellen.benutzer_q();
        let sql = format!(
            "UPDATE {b} SET verified_at = ? WHERE id = ? AND {} AND {}",
            inaktiver_benutzer(&b),
            normaler_benutzer(&b),
        );

        let affected = sqlx::query(&sql)
            .bind(zeit_text(&Utc::now()))
            .bind(id.inner())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected > 0 {
            tracing::info!(user_id = %id, "Benutzer aktiviert");
        }
        Ok(affected > 0)
    }

    async fn soft_delete(&self, id: UserId) -> DbResult<bool> {
        let b = self.tabellen.benutzer_q();
        let sql = format!(
            "UPDATE {b} SET deleted_at = ? WHERE id = ? AND {}",
            normaler_benutzer(&b)
        );

        let affected = sqlx::query(&sql)
            .bind(zeit_text(&Utc::now()))
            .bind(id.inner())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn get_by_session_token(&self, token: &str) -> DbResult<Option<BenutzerRecord>> {
        let b = self.tabellen.benutzer_q();
        let s = self.tabellen.session_q();
        let sql = format!(
            "SELECT {} FROM {b}
             JOIN {s} ON {s}.token = ? AND {s}.expired_at >= ?
             WHERE {b}.id = {s}.owner_id AND {}
             LIMIT 1",
            spalten(&b, &BENUTZER_SPALTEN),
            normaler_benutzer(&b),
        );

        let row = sqlx::query(&sql)
            .bind(token)
            .bind(zeit_text(&Utc::now()))
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_benutzer(&r)).transpose()
    }
}

/// Suchschluessel fuer Einzelabfragen
enum Schluessel<'a> {
    Id(UserId),
    Username(&'a str),
    Email(&'a str),
}

impl SqliteDb {
    /// Laedt hoechstens einen normalen Benutzer zum Schluessel
    async fn benutzer_laden(&self, schluessel: Schluessel<'_>) -> DbResult<Option<BenutzerRecord>> {
        let b = self.tabellen.benutzer_q();
        let spalte = match schluessel {
            Schluessel::Id(_) => "id",
            Schluessel::Username(_) => "username",
            Schluessel::Email(_) => "email",
        };
        let sql = format!(
            "SELECT {} FROM {b} WHERE {b}.{spalte} = ? AND {} LIMIT 1",
            spalten(&b, &BENUTZER_SPALTEN),
            normaler_benutzer(&b),
        );

        let query = sqlx::query(&sql);
        let query = match schluessel {
            Schluessel::Id(id) => query.bind(id.inner()),
            Schluessel::Username(wert) | Schluessel::Email(wert) => query.bind(wert),
        };

        let row = query.fetch_optional(&self.pool).await?;
        row.map(|r| row_to_benutzer(&r)).transpose()
    }
}

pub(crate) async fn benutzer_einfuegen(
    conn: &mut SqliteConnection,
    t: &Tabellennamen,
    data: &NeuerBenutzer<'_>,
) -> DbResult<BenutzerRecord> {
    let now = Utc::now();
    let sql = format!(
        "INSERT INTO {} (email, encrypted_password, username, name, public_email,
                         created_at, register_ip, is_admin)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        t.benutzer_q()
    );

    let id = sqlx::query(&sql)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.username)
        .bind(data.name)
        .bind(data.public_email)
        .bind(zeit_text(&now))
        .bind(data.register_ip)
        .bind(data.is_admin)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            DbError::aus_sqlx(e, || {
                format!(
                    "Benutzername '{}' oder E-Mail '{}' bereits vergeben",
                    data.username, data.email
                )
            })
        })?
        .last_insert_rowid();

    Ok(BenutzerRecord {
        id: UserId(id),
        email: data.email.to_string(),
        username: data.username.to_string(),
        name: data.name.to_string(),
        password_hash: data.password_hash.to_string(),
        public_email: data.public_email,
        is_admin: data.is_admin,
        namespace_id: None,
        created_at: now,
        deleted_at: None,
        verified_at: None,
        last_login_at: None,
        last_login_ip: None,
        register_ip: data.register_ip.to_string(),
    })
}

pub(crate) async fn login_aktualisieren(
    conn: &mut SqliteConnection,
    t: &Tabellennamen,
    id: UserId,
    client_ip: &str,
) -> DbResult<()> {
    let sql = format!(
        "UPDATE {} SET last_login_at = ?, last_login_ip = ? WHERE id = ?",
        t.benutzer_q()
    );
    let affected = sqlx::query(&sql)
        .bind(zeit_text(&Utc::now()))
        .bind(client_ip)
        .bind(id.inner())
        .execute(&mut *conn)
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(DbError::nicht_gefunden(format!("Benutzer {id}")));
    }
    Ok(())
}

pub(crate) async fn namespace_setzen(
    conn: &mut SqliteConnection,
    t: &Tabellennamen,
    id: UserId,
    namespace_id: NamespaceId,
) -> DbResult<()> {
    let sql = format!("UPDATE {} SET namespace_id = ? WHERE id = ?", t.benutzer_q());
    let affected = sqlx::query(&sql)
        .bind(namespace_id.inner())
        .bind(id.inner())
        .execute(&mut *conn)
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(DbError::nicht_gefunden(format!("Benutzer {id}")));
    }
    Ok(())
}

fn row_to_benutzer(row: &sqlx::sqlite::SqliteRow) -> DbResult<BenutzerRecord> {
    let namespace_id: Option<i64> = row.try_get("namespace_id")?;

    Ok(BenutzerRecord {
        id: UserId(row.try_get("id")?),
        email: row.try_get("email")?,
        username: row.try_get("username")?,
        name: row.try_get("name")?,
        password_hash: row.try_get("encrypted_password")?,
        public_email: row.try_get("public_email")?,
        is_admin: row.try_get("is_admin")?,
        namespace_id: namespace_id.map(NamespaceId),
        created_at: parse_datetime(row, "created_at")?,
        deleted_at: parse_opt_datetime(row, "deleted_at")?,
        verified_at: parse_opt_datetime(row, "verified_at")?,
        last_login_at: parse_opt_datetime(row, "last_login_at")?,
        last_login_ip: row.try_get("last_login_ip")?,
        register_ip: row.try_get("register_ip")?,
    })
}
