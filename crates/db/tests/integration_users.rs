//! Integration-Tests fuer UserRepository (In-Memory SQLite)

use werkhof_core::{NamespaceId, OwnerTyp, UserId};
use werkhof_db::{
    models::{NeuerBenutzer, NeuerNamespace},
    NamespaceRepository, SqliteDb, Tabellennamen, UserRepository,
};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

fn neuer<'a>(username: &'a str, email: &'a str) -> NeuerBenutzer<'a> {
    NeuerBenutzer {
        email,
        username,
        name: username,
        password_hash: "hash",
        public_email: false,
        is_admin: false,
        register_ip: "10.0.0.1",
    }
}

async fn erstelle(db: &SqliteDb, username: &str) -> UserId {
    let email = format!("{username}@example.org");
    UserRepository::create(db, neuer(username, &email))
        .await
        .expect("Benutzer erstellen fehlgeschlagen")
        .id
}

#[tokio::test]
async fn benutzer_erstellen_und_laden() {
    let db = db().await;

    let user = UserRepository::create(&db, neuer("alice", "alice@example.org"))
        .await
        .expect("Benutzer erstellen fehlgeschlagen");

    assert_eq!(user.username, "alice");
    assert!(!user.ist_verifiziert());
    assert!(user.namespace_id.is_none());

    let geladen = db
        .get_by_id(user.id)
        .await
        .expect("get_by_id fehlgeschlagen")
        .expect("Benutzer sollte gefunden werden");

    assert_eq!(geladen.id, user.id);
    assert_eq!(geladen.email, "alice@example.org");
    assert_eq!(geladen.password_hash, "hash");
    assert_eq!(geladen.register_ip, "10.0.0.1");
    assert!(!geladen.is_admin);
}

#[tokio::test]
async fn benutzer_nach_name_und_email_laden() {
    let db = db().await;
    erstelle(&db, "bob").await;

    let per_name = db.get_by_username("bob").await.unwrap().expect("bob per Name");
    let per_mail = db
        .get_by_email("bob@example.org")
        .await
        .unwrap()
        .expect("bob per E-Mail");
    assert_eq!(per_name.id, per_mail.id);

    assert!(db.get_by_username("unbekannt").await.unwrap().is_none());
    assert!(db.get_by_email("unbekannt@example.org").await.unwrap().is_none());
}

#[tokio::test]
async fn username_und_email_eindeutig() {
    let db = db().await;
    erstelle(&db, "charlie").await;

    let gleicher_name = UserRepository::create(&db, neuer("charlie", "anders@example.org")).await;
    assert!(gleicher_name.unwrap_err().ist_eindeutigkeit());

    let gleiche_mail = UserRepository::create(&db, neuer("anders", "charlie@example.org")).await;
    assert!(gleiche_mail.unwrap_err().ist_eindeutigkeit());
}

#[tokio::test]
async fn geloeschte_benutzer_geben_namen_frei() {
    let db = db().await;
    let id = erstelle(&db, "dora").await;

    assert!(db.soft_delete(id).await.unwrap());
    assert!(!db.soft_delete(id).await.unwrap(), "zweites Loeschen aendert nichts");

    assert!(db.get_by_id(id).await.unwrap().is_none());
    assert!(db.get_by_username("dora").await.unwrap().is_none());

    // Eindeutigkeit gilt nur unter nicht geloeschten Zeilen
    let neu = UserRepository::create(&db, neuer("dora", "dora@example.org"))
        .await
        .expect("Name eines geloeschten Benutzers muss wieder frei sein");
    assert_ne!(neu.id, id);
}

#[tokio::test]
async fn existenz_pruefung() {
    let db = db().await;
    let id = erstelle(&db, "erik").await;

    assert!(db.exists_email_or_username("erik", "").await.unwrap());
    assert!(db.exists_email_or_username("", "erik@example.org").await.unwrap());
    assert!(db
        .exists_email_or_username("niemand", "erik@example.org")
        .await
        .unwrap());
    assert!(!db
        .exists_email_or_username("niemand", "niemand@example.org")
        .await
        .unwrap());
    assert!(!db.exists_email_or_username("", "").await.unwrap());

    db.soft_delete(id).await.unwrap();
    assert!(
        !db.exists_email_or_username("erik", "erik@example.org").await.unwrap(),
        "Geloeschte Benutzer zaehlen nicht"
    );
}

#[tokio::test]
async fn seitenweise_liste() {
    let db = db().await;
    let mut ids = Vec::new();
    for i in 1..=25 {
        ids.push(erstelle(&db, &format!("u{i:02}")).await);
    }

    let seite = db.list_all(1, 10).await.unwrap();
    let namen: Vec<_> = seite.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(
        namen,
        vec!["u11", "u12", "u13", "u14", "u15", "u16", "u17", "u18", "u19", "u20"]
    );

    let letzte = db.list_all(2, 10).await.unwrap();
    assert_eq!(letzte.len(), 5);

    assert!(db.list_all(100, 10).await.unwrap().is_empty());

    // Geloeschte Benutzer verschieben die Seiten
    db.soft_delete(ids[0]).await.unwrap();
    let seite = db.list_all(1, 10).await.unwrap();
    assert_eq!(seite[0].username, "u12");
}

#[tokio::test]
async fn aktivieren_nur_wenn_inaktiv() {
    let db = db().await;
    let id = erstelle(&db, "fritz").await;

    assert!(db.activate(id).await.unwrap());
    let erstes = db.get_by_id(id).await.unwrap().unwrap().verified_at;
    assert!(erstes.is_some());

    assert!(!db.activate(id).await.unwrap(), "bereits aktiv");
    let zweites = db.get_by_id(id).await.unwrap().unwrap().verified_at;
    assert_eq!(erstes, zweites, "verified_at darf sich nicht aendern");
}

#[tokio::test]
async fn login_und_namespace_aktualisieren() {
    let db = db().await;
    let id = erstelle(&db, "gina").await;

    db.update_login(id, "192.168.0.7").await.unwrap();
    db.update_namespace(id, NamespaceId(42)).await.unwrap();

    let u = db.get_by_id(id).await.unwrap().unwrap();
    assert!(u.last_login_at.is_some());
    assert_eq!(u.last_login_ip.as_deref(), Some("192.168.0.7"));
    assert_eq!(u.namespace_id, Some(NamespaceId(42)));

    let fehlt = db.update_login(UserId(9999), "1.1.1.1").await;
    assert!(fehlt.is_err());
}

#[tokio::test]
async fn admins_mit_namespace() {
    let db = db().await;

    let admin = UserRepository::create(
        &db,
        NeuerBenutzer {
            is_admin: true,
            ..neuer("root", "root@example.org")
        },
    )
    .await
    .unwrap();
    let admin_ohne_ns = UserRepository::create(
        &db,
        NeuerBenutzer {
            is_admin: true,
            ..neuer("ops", "ops@example.org")
        },
    )
    .await
    .unwrap();
    erstelle(&db, "normalo").await;

    NamespaceRepository::create(
        &db,
        NeuerNamespace {
            owner_id: admin.id.inner(),
            owner_typ: OwnerTyp::Benutzer,
            path: "root",
        },
    )
    .await
    .unwrap();

    let admins = db.list_admins().await.unwrap();
    assert_eq!(admins.len(), 2);
    assert_eq!(admins[0].benutzer.id, admin.id);
    assert_eq!(admins[0].namespace_path(), Some("root"));
    assert_eq!(admins[1].benutzer.id, admin_ohne_ns.id);
    assert!(admins[1].namespace.is_none());
}

#[tokio::test]
async fn eigene_tabellennamen() {
    let db = SqliteDb::in_memory_mit(Tabellennamen {
        benutzer: "konto".into(),
        session: "anmeldung".into(),
        namespace: "raum".into(),
    })
    .await
    .unwrap();

    let id = erstelle(&db, "hanna").await;
    assert!(db.get_by_id(id).await.unwrap().is_some());

    let anzahl: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM \"konto\"")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(anzahl, 1);
}
