//! SQLite-Implementierung des SessionRepository

use chrono::Utc;
use sqlx::{Row, SqliteConnection};
use werkhof_core::UserId;

use crate::error::DbError;
use crate::models::{NeueSession, SessionRecord};
use crate::repository::{DbResult, SessionRepository, Tabellennamen};
use crate::sqlite::filter::{parse_datetime, spalten, zeit_text};
use crate::sqlite::pool::SqliteDb;

const SESSION_SPALTEN: [&str; 6] = ["id", "owner_id", "token", "client_ip", "created_at", "expired_at"];

impl SessionRepository for SqliteDb {
    async fn create(&self, data: NeueSession<'_>) -> DbResult<SessionRecord> {
        let mut conn = self.pool.acquire().await?;
        session_einfuegen(&mut conn, &self.tabellen, &data).await
    }

    async fn get_valid(&self, token: &str) -> DbResult<Option<SessionRecord>> {
        let s = self.tabellen.session_q();
        let sql = format!(
            "SELECT {} FROM {s} WHERE {s}.token = ? AND {s}.expired_at >= ?",
            spalten(&s, &SESSION_SPALTEN)
        );

        let row = sqlx::query(&sql)
            .bind(token)
            .bind(zeit_text(&Utc::now()))
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_session(&r)).transpose()
    }
}

pub(crate) async fn session_einfuegen(
    conn: &mut SqliteConnection,
    t: &Tabellennamen,
    data: &NeueSession<'_>,
) -> DbResult<SessionRecord> {
    let sql = format!(
        "INSERT INTO {} (owner_id, token, client_ip, created_at, expired_at)
         VALUES (?, ?, ?, ?, ?)",
        t.session_q()
    );

    let id = sqlx::query(&sql)
        .bind(data.owner_id.inner())
        .bind(data.token)
        .bind(data.client_ip)
        .bind(zeit_text(&data.created_at))
        .bind(zeit_text(&data.expired_at))
        .execute(&mut *conn)
        .await
        .map_err(|e| DbError::aus_sqlx(e, || "Session-Token bereits vergeben".to_string()))?
        .last_insert_rowid();

    tracing::debug!(user_id = %data.owner_id, session_id = id, "Session gespeichert");

    Ok(SessionRecord {
        id,
        owner_id: data.owner_id,
        token: data.token.to_string(),
        client_ip: data.client_ip.to_string(),
        created_at: data.created_at,
        expired_at: data.expired_at,
    })
}

fn row_to_session(row: &sqlx::sqlite::SqliteRow) -> DbResult<SessionRecord> {
    Ok(SessionRecord {
        id: row.try_get("id")?,
        owner_id: UserId(row.try_get("owner_id")?),
        token: row.try_get("token")?,
        client_ip: row.try_get("client_ip")?,
        created_at: parse_datetime(row, "created_at")?,
        expired_at: parse_datetime(row, "expired_at")?,
    })
}
