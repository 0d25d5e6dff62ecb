//! SQLite Connection Pool mit WAL-Modus und Schema-Anlage

use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::error::DbError;
use crate::repository::{DatabaseConfig, DbResult, Tabellennamen};

/// Wrapper um den SQLite Connection Pool
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pub(crate) pool: SqlitePool,
    pub(crate) tabellen: Arc<Tabellennamen>,
}

impl SqliteDb {
    /// Erstellt einen neuen Pool und legt das Schema an
    pub async fn oeffnen(config: &DatabaseConfig) -> Result<Self, DbError> {
        config.tabellen.validieren()?;

        let opts = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(if config.sqlite_wal {
                SqliteJournalMode::Wal
            } else {
                SqliteJournalMode::Delete
            })
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_verbindungen)
            .connect_with(opts)
            .await?;

        info!(url = %config.url, wal = config.sqlite_wal, "SQLite-Pool geoeffnet");

        let db = Self {
            pool,
            tabellen: Arc::new(config.tabellen.clone()),
        };
        db.schema_anlegen().await?;

        Ok(db)
    }

    /// Erstellt eine In-Memory-Datenbank fuer Tests
    pub async fn in_memory() -> Result<Self, DbError> {
        Self::in_memory_mit(Tabellennamen::default()).await
    }

    /// In-Memory-Datenbank mit abweichenden Tabellennamen
    pub async fn in_memory_mit(tabellen: Tabellennamen) -> Result<Self, DbError> {
        tabellen.validieren()?;

        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            // In-Memory benoetigt mindestens 1 persistente Verbindung
            .min_connections(1)
            .connect_with(opts)
            .await?;

        let db = Self {
            pool,
            tabellen: Arc::new(tabellen),
        };
        db.schema_anlegen().await?;
        Ok(db)
    }

    /// Legt alle Tabellen und Indizes an, falls sie noch fehlen
    pub async fn schema_anlegen(&self) -> DbResult<()> {
        for stmt in schema_statements(&self.tabellen) {
            sqlx::query(&stmt).execute(&self.pool).await?;
        }
        info!(
            benutzer = %self.tabellen.benutzer,
            session = %self.tabellen.session,
            namespace = %self.tabellen.namespace,
            "Datenbank-Schema bereit"
        );
        Ok(())
    }

    /// Prueft die Verbindung mit einer trivialen Abfrage (Health-Check)
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Gibt den internen Pool zurueck (fuer Tests)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn tabellen(&self) -> &Tabellennamen {
        &self.tabellen
    }
}

/// CREATE-Statements fuer die konfigurierten Tabellennamen
///
/// E-Mail und Benutzername sind nur unter nicht geloeschten Zeilen
/// eindeutig (partielle Indizes).
fn schema_statements(t: &Tabellennamen) -> Vec<String> {
    let b = t.benutzer_q();
    let s = t.session_q();
    let n = t.namespace_q();
    let bn = &t.benutzer;
    let sn = &t.session;

    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS {b} (
                id                 INTEGER PRIMARY KEY AUTOINCREMENT,
                email              TEXT NOT NULL,
                encrypted_password TEXT NOT NULL,
                username           TEXT NOT NULL,
                name               TEXT NOT NULL,
                public_email       INTEGER NOT NULL DEFAULT 0,
                created_at         TEXT NOT NULL,
                deleted_at         TEXT,
                verified_at        TEXT,
                last_login_at      TEXT,
                last_login_ip      TEXT,
                register_ip        TEXT NOT NULL,
                is_admin           INTEGER NOT NULL DEFAULT 0,
                namespace_id       INTEGER
            )"
        ),
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS \"{bn}_email_aktiv\"
             ON {b} (email) WHERE deleted_at IS NULL"
        ),
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS \"{bn}_username_aktiv\"
             ON {b} (username) WHERE deleted_at IS NULL"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {s} (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id   INTEGER NOT NULL REFERENCES {b} (id),
                token      TEXT NOT NULL UNIQUE,
                client_ip  TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expired_at TEXT NOT NULL
            )"
        ),
        format!("CREATE INDEX IF NOT EXISTS \"{sn}_owner\" ON {s} (owner_id)"),
        format!(
            "CREATE TABLE IF NOT EXISTS {n} (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id   INTEGER NOT NULL,
                owner_type INTEGER NOT NULL,
                path       TEXT NOT NULL UNIQUE,
                UNIQUE (owner_id, owner_type)
            )"
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_nutzt_konfigurierte_namen() {
        let t = Tabellennamen {
            benutzer: "konto".into(),
            session: "anmeldung".into(),
            namespace: "raum".into(),
        };
        let stmts = schema_statements(&t);
        assert!(stmts[0].contains("CREATE TABLE IF NOT EXISTS \"konto\""));
        assert!(stmts[1].contains("\"konto_email_aktiv\""));
        assert!(stmts[3].contains("REFERENCES \"konto\" (id)"));
        assert!(stmts[5].contains("\"raum\""));
    }

    #[tokio::test]
    async fn in_memory_mit_ungueltigem_namen_schlaegt_fehl() {
        let t = Tabellennamen {
            benutzer: "user name".into(),
            ..Default::default()
        };
        let ergebnis = SqliteDb::in_memory_mit(t).await;
        assert!(matches!(ergebnis, Err(DbError::UngueltigeDaten(_))));
    }
}
