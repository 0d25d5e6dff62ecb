//! Auth-Service fuer Werkhof
//!
//! Zentraler Service fuer Login, Registrierung, Aktivierung und
//! Session-Pruefung. Nutzt die DB-Repositories; mehrschrittige
//! Schreibvorgaenge laufen ueber `LoginRepository` in einer Transaktion.

use std::sync::Arc;

use werkhof_core::{OwnerTyp, UserId};
use werkhof_db::{
    models::{BenutzerMitNamespace, BenutzerRecord, NamespaceRecord, NeuerBenutzer},
    repository::{LoginRepository, NamespaceRepository, UserRepository},
};

use crate::{
    error::{AuthError, AuthResult},
    login::{Kennung, LoginAnfrage, LoginAntwort, Registrierung},
    password::{passwort_hashen, passwort_verifizieren},
    session::{SessionEntwurf, SessionRichtlinie},
};

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
pub struct AuthService<R> {
    repo: Arc<R>,
    richtlinie: SessionRichtlinie,
}

impl<R> Clone for AuthService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            richtlinie: self.richtlinie,
        }
    }
}

impl<R: UserRepository + NamespaceRepository + LoginRepository> AuthService<R> {
    /// Erstellt einen neuen AuthService
    pub fn neu(repo: Arc<R>, richtlinie: SessionRichtlinie) -> Self {
        Self { repo, richtlinie }
    }

    pub fn richtlinie(&self) -> &SessionRichtlinie {
        &self.richtlinie
    }

    /// Prueft die Anmeldedaten
    ///
    /// Reihenfolge: Benutzer vorhanden, Konto aktiviert, Passwort korrekt.
    async fn validieren(&self, bezeichner: &str, passwort: &str) -> AuthResult<BenutzerRecord> {
        let kennung = Kennung::aufloesen(bezeichner);
        let benutzer = match kennung {
            Kennung::Email(email) => self.repo.get_by_email(email).await?,
            Kennung::Username(username) => self.repo.get_by_username(username).await?,
        }
        .ok_or_else(|| AuthError::NichtGefunden(kennung.als_str().to_string()))?;

        if !benutzer.ist_verifiziert() {
            return Err(AuthError::ZugriffVerweigert);
        }

        if !passwort_verifizieren(passwort, &benutzer.password_hash)? {
            tracing::warn!(user_id = %benutzer.id, "Fehlgeschlagener Login-Versuch");
            return Err(AuthError::UngueltigerParameter);
        }

        Ok(benutzer)
    }

    /// Meldet einen Benutzer an
    ///
    /// Aktualisiert Zeitpunkt und IP des letzten Logins, legt eine neue
    /// Session an und laedt den Namespace, alles in einer Transaktion.
    pub async fn anmelden(&self, anfrage: &LoginAnfrage, client_ip: &str) -> AuthResult<LoginAntwort> {
        let benutzer = self.validieren(&anfrage.email, &anfrage.password).await?;

        let entwurf = SessionEntwurf::neu(&self.richtlinie);
        let ergebnis = self
            .repo
            .login_festschreiben(
                benutzer.id,
                client_ip,
                entwurf.als_neue_session(benutzer.id, client_ip),
            )
            .await?;

        tracing::info!(
            user_id = %benutzer.id,
            username = %benutzer.username,
            client_ip = %client_ip,
            "Benutzer angemeldet"
        );

        Ok(LoginAntwort {
            token: ergebnis.session.token,
            namespace_path: ergebnis.namespace.map(|n| n.path),
            name: benutzer.name,
            email: benutzer.email,
            public_email: benutzer.public_email,
        })
    }

    /// Registriert einen neuen (noch nicht aktivierten) Benutzer samt Namespace
    pub async fn registrieren(
        &self,
        daten: &Registrierung,
        client_ip: &str,
    ) -> AuthResult<BenutzerMitNamespace> {
        daten.pruefen()?;

        let username = daten.username.trim();
        let email = daten.email.trim();

        if self.repo.exists_email_or_username(username, email).await? {
            return Err(AuthError::BereitsVergeben);
        }

        let passwort_hash = passwort_hashen(&daten.password)?;

        let ergebnis = self
            .repo
            .registrierung_festschreiben(
                NeuerBenutzer {
                    email,
                    username,
                    name: daten.anzeigename(),
                    password_hash: &passwort_hash,
                    public_email: daten.public_email,
                    is_admin: false,
                    register_ip: client_ip,
                },
                username,
            )
            .await
            .map_err(|e| {
                // Parallele Registrierung mit gleichem Namen
                if e.ist_eindeutigkeit() {
                    AuthError::BereitsVergeben
                } else {
                    AuthError::Datenbank(e)
                }
            })?;

        tracing::info!(
            user_id = %ergebnis.benutzer.id,
            username = %ergebnis.benutzer.username,
            "Neuer Benutzer registriert"
        );

        Ok(ergebnis)
    }

    /// Aktiviert ein Konto; `false` wenn es bereits aktiv war
    pub async fn aktivieren(&self, user_id: UserId) -> AuthResult<bool> {
        if self.repo.get_by_id(user_id).await?.is_none() {
            return Err(AuthError::NichtGefunden(user_id.to_string()));
        }
        Ok(self.repo.activate(user_id).await?)
    }

    /// Validiert einen Session-Token und gibt den zugehoerigen Benutzer zurueck
    pub async fn session_validieren(&self, token: &str) -> AuthResult<BenutzerRecord> {
        self.repo
            .get_by_session_token(token)
            .await?
            .ok_or(AuthError::SessionUngueltig)
    }

    /// Laedt den Benutzer-Namespace eines Kontos
    pub async fn namespace_laden(&self, benutzer: &BenutzerRecord) -> AuthResult<Option<NamespaceRecord>> {
        Ok(self
            .repo
            .get_by_owner(benutzer.id.inner(), OwnerTyp::Benutzer)
            .await?)
    }

    pub async fn benutzer_liste(&self, page: u64, per: u64) -> AuthResult<Vec<BenutzerRecord>> {
        Ok(self.repo.list_all(page, per).await?)
    }

    pub async fn admin_liste(&self) -> AuthResult<Vec<BenutzerMitNamespace>> {
        Ok(self.repo.list_admins().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use werkhof_db::{SqliteDb, UserRepository};

    async fn test_service() -> (AuthService<SqliteDb>, Arc<SqliteDb>) {
        let db = Arc::new(SqliteDb::in_memory().await.expect("In-Memory DB"));
        (
            AuthService::neu(Arc::clone(&db), SessionRichtlinie::default()),
            db,
        )
    }

    fn registrierung(username: &str, passwort: &str) -> Registrierung {
        Registrierung {
            email: format!("{username}@example.org"),
            username: username.into(),
            name: format!("{username} Name"),
            password: passwort.into(),
            public_email: true,
        }
    }

    fn anfrage(bezeichner: &str, passwort: &str) -> LoginAnfrage {
        LoginAnfrage {
            email: bezeichner.into(),
            password: passwort.into(),
        }
    }

    async fn aktiver_benutzer(service: &AuthService<SqliteDb>, username: &str, pw: &str) -> UserId {
        let reg = service
            .registrieren(&registrierung(username, pw), "10.0.0.1")
            .await
            .expect("Registrierung fehlgeschlagen");
        assert!(service.aktivieren(reg.benutzer.id).await.unwrap());
        reg.benutzer.id
    }

    async fn session_anzahl(db: &SqliteDb) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM \"session\"")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn anmelden_per_email_und_username() {
        let (service, db) = test_service().await;
        let id = aktiver_benutzer(&service, "anna", "geheim!").await;

        let antwort = service
            .anmelden(&anfrage("anna@example.org", "geheim!"), "192.168.1.5")
            .await
            .expect("Login per E-Mail fehlgeschlagen");

        assert_eq!(antwort.namespace_path.as_deref(), Some("anna"));
        assert_eq!(antwort.name, "anna Name");
        assert_eq!(antwort.email, "anna@example.org");
        assert!(antwort.public_email);

        let session = werkhof_db::SessionRepository::get_valid(db.as_ref(), &antwort.token)
            .await
            .unwrap()
            .expect("Session zum Token erwartet");
        assert_eq!(session.owner_id, id);
        assert_eq!(session.client_ip, "192.168.1.5");

        let benutzer = db.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(benutzer.last_login_ip.as_deref(), Some("192.168.1.5"));

        service
            .anmelden(&anfrage("anna", "geheim!"), "192.168.1.5")
            .await
            .expect("Login per Benutzername fehlgeschlagen");
    }

    #[tokio::test]
    async fn unbekannter_benutzer() {
        let (service, _) = test_service().await;
        let ergebnis = service.anmelden(&anfrage("niemand", "x"), "1.1.1.1").await;
        assert!(matches!(ergebnis, Err(AuthError::NichtGefunden(_))));
    }

    #[tokio::test]
    async fn nicht_aktivierter_benutzer_wird_abgewiesen() {
        let (service, db) = test_service().await;
        service
            .registrieren(&registrierung("bert", "richtig"), "10.0.0.1")
            .await
            .unwrap();

        for pw in ["richtig", "falsch"] {
            let ergebnis = service.anmelden(&anfrage("bert", pw), "1.1.1.1").await;
            assert!(
                matches!(ergebnis, Err(AuthError::ZugriffVerweigert)),
                "unabhaengig vom Passwort ({pw})"
            );
        }
        assert_eq!(session_anzahl(&db).await, 0);
    }

    #[tokio::test]
    async fn falsches_passwort_legt_keine_session_an() {
        let (service, db) = test_service().await;
        let id = aktiver_benutzer(&service, "carla", "richtig").await;

        let ergebnis = service.anmelden(&anfrage("carla", "falsch"), "1.1.1.1").await;
        assert!(matches!(ergebnis, Err(AuthError::UngueltigerParameter)));

        assert_eq!(session_anzahl(&db).await, 0);
        let benutzer = db.get_by_id(id).await.unwrap().unwrap();
        assert!(benutzer.last_login_at.is_none());
    }

    #[tokio::test]
    async fn parallele_logins_erzeugen_getrennte_sessions() {
        let (service, _) = test_service().await;
        let id = aktiver_benutzer(&service, "dora", "pw").await;

        let a = anfrage("dora", "pw");
        let b = anfrage("dora@example.org", "pw");
        let (eins, zwei) = tokio::join!(
            service.anmelden(&a, "10.0.0.1"),
            service.anmelden(&b, "10.0.0.2"),
        );
        let (eins, zwei) = (eins.unwrap(), zwei.unwrap());

        assert_ne!(eins.token, zwei.token);
        assert_eq!(service.session_validieren(&eins.token).await.unwrap().id, id);
        assert_eq!(service.session_validieren(&zwei.token).await.unwrap().id, id);
    }

    #[tokio::test]
    async fn session_validierung() {
        let (service, _) = test_service().await;
        aktiver_benutzer(&service, "emil", "pw").await;
        let antwort = service.anmelden(&anfrage("emil", "pw"), "10.0.0.1").await.unwrap();

        let benutzer = service.session_validieren(&antwort.token).await.unwrap();
        assert_eq!(benutzer.username, "emil");
        let ns = service.namespace_laden(&benutzer).await.unwrap().unwrap();
        assert_eq!(ns.path, "emil");

        let ergebnis = service.session_validieren("kein_gueltiger_token").await;
        assert!(matches!(ergebnis, Err(AuthError::SessionUngueltig)));
    }

    #[tokio::test]
    async fn doppelte_registrierung_schlaegt_fehl() {
        let (service, _) = test_service().await;
        service
            .registrieren(&registrierung("fritz", "pw"), "10.0.0.1")
            .await
            .unwrap();

        let gleicher_name = Registrierung {
            email: "anders@example.org".into(),
            ..registrierung("fritz", "pw")
        };
        let ergebnis = service.registrieren(&gleicher_name, "10.0.0.1").await;
        assert!(matches!(ergebnis, Err(AuthError::BereitsVergeben)));

        let gleiche_mail = Registrierung {
            email: "fritz@example.org".into(),
            ..registrierung("franz", "pw")
        };
        let ergebnis = service.registrieren(&gleiche_mail, "10.0.0.1").await;
        assert!(matches!(ergebnis, Err(AuthError::BereitsVergeben)));
    }

    #[tokio::test]
    async fn registrierung_speichert_argon2_hash() {
        let (service, _) = test_service().await;
        let reg = service
            .registrieren(&registrierung("gina", "klartext"), "10.3.3.3")
            .await
            .unwrap();

        assert!(reg.benutzer.password_hash.starts_with("$argon2id$"));
        assert_eq!(reg.benutzer.register_ip, "10.3.3.3");
        assert!(!reg.benutzer.ist_verifiziert());
        assert_eq!(reg.namespace_path(), Some("gina"));
    }

    #[tokio::test]
    async fn neuregistrierung_nach_loeschung() {
        let (service, db) = test_service().await;
        let alt = aktiver_benutzer(&service, "jonas", "alt").await;
        assert!(db.soft_delete(alt).await.unwrap());
        assert!(!db
            .exists_email_or_username("jonas", "jonas@example.org")
            .await
            .unwrap());

        let neu = service
            .registrieren(&registrierung("jonas", "neu"), "10.0.0.9")
            .await
            .expect("geloeschter Name muss wieder registrierbar sein");
        assert_ne!(neu.benutzer.id, alt);
        assert_eq!(neu.namespace_path(), Some("jonas"));

        service.aktivieren(neu.benutzer.id).await.unwrap();
        let antwort = service
            .anmelden(&anfrage("jonas", "neu"), "10.0.0.9")
            .await
            .unwrap();
        assert_eq!(antwort.namespace_path.as_deref(), Some("jonas"));
    }

    #[tokio::test]
    async fn aktivieren_unbekannter_benutzer() {
        let (service, _) = test_service().await;
        let ergebnis = service.aktivieren(UserId(999)).await;
        assert!(matches!(ergebnis, Err(AuthError::NichtGefunden(_))));
    }

    #[tokio::test]
    async fn admin_liste_und_benutzer_liste() {
        let (service, db) = test_service().await;
        let id = aktiver_benutzer(&service, "hans", "pw").await;
        sqlx::query("UPDATE \"user\" SET is_admin = 1 WHERE id = ?")
            .bind(id.inner())
            .execute(db.pool())
            .await
            .unwrap();
        aktiver_benutzer(&service, "ida", "pw").await;

        let admins = service.admin_liste().await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].namespace_path(), Some("hans"));

        assert_eq!(service.benutzer_liste(0, 10).await.unwrap().len(), 2);
        assert_eq!(service.benutzer_liste(1, 1).await.unwrap()[0].username, "ida");
    }
}
