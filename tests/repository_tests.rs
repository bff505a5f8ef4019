//! Transaction and session properties checked against real SQLite files.

use chrono::NaiveDate;
use filmoteka::db::{
    ActorRepository, FilmRepository, SessionRepository, Store, TowerSessionRepository,
    UserRepository,
};
use filmoteka::domain::{ActorId, FilmId, FilmSort, Gender, Role, UserId};
use filmoteka::models::{ActorInput, Film, FilmInput};
use filmoteka::services::{DefaultSessionService, SessionError, SessionService};
use std::sync::Arc;
use tower_sessions_sqlx_store::SqliteStore;

async fn temp_store() -> Store {
    let db_path = std::env::temp_dir().join(format!(
        "filmoteka-repo-test-{}.db",
        uuid::Uuid::new_v4()
    ));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open store")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn film(name: &str, rating: f64) -> FilmInput {
    FilmInput {
        name: name.to_string(),
        description: format!("About {name}"),
        date_of_release: date(1986, 5, 9),
        rating,
    }
}

async fn add_actor(store: &Store, name: &str, surname: &str) -> ActorId {
    store
        .actor_repo()
        .add_actor(&ActorInput {
            name: name.to_string(),
            surname: surname.to_string(),
            gender: Gender::Male,
            birthday: date(1940, 1, 1),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_add_film_with_missing_actor_rolls_back() {
    let store = temp_store().await;
    let repo = store.film_repo();
    let actor = add_actor(&store, "Erland", "Josephson").await;

    let result = repo
        .add_film(&film("X", 5.1), &[actor, ActorId::new(999)])
        .await
        .unwrap();
    assert!(result.is_none());

    assert!(repo.get_films(FilmSort::Rating).await.unwrap().is_empty());
    let actor = store.actor_repo().get_actor_by_id(actor).await.unwrap().unwrap();
    assert!(actor.films.is_empty());
}

#[tokio::test]
async fn test_add_film_creates_exact_join_rows() {
    let store = temp_store().await;
    let repo = store.film_repo();
    let a = add_actor(&store, "Erland", "Josephson").await;
    let b = add_actor(&store, "Susan", "Fleetwood").await;

    let id = repo
        .add_film(&film("The Sacrifice", 7.9), &[b, a, b])
        .await
        .unwrap()
        .unwrap();

    let stored = repo.get_film_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored, film("The Sacrifice", 7.9).with_id(id));

    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(repo.get_film_actor_ids(id).await.unwrap(), expected);
}

#[tokio::test]
async fn test_update_film_replaces_actor_set() {
    let store = temp_store().await;
    let repo = store.film_repo();
    let a = add_actor(&store, "Erland", "Josephson").await;
    let b = add_actor(&store, "Susan", "Fleetwood").await;
    let c = add_actor(&store, "Allan", "Edwall").await;

    let id = repo.add_film(&film("Nostalghia", 8.0), &[a, b]).await.unwrap().unwrap();

    let updated = Film {
        rating: 8.2,
        ..film("Nostalghia", 8.0).with_id(id)
    };
    assert!(repo.update_film(&updated, &[c]).await.unwrap());

    assert_eq!(repo.get_film_actor_ids(id).await.unwrap(), vec![c]);
    assert_eq!(repo.get_film_by_id(id).await.unwrap().unwrap().rating, 8.2);

    assert!(repo.update_film(&updated, &[]).await.unwrap());
    assert!(repo.get_film_actor_ids(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_update_changes_nothing() {
    let store = temp_store().await;
    let repo = store.film_repo();
    let a = add_actor(&store, "Erland", "Josephson").await;

    let id = repo.add_film(&film("Stalker", 8.1), &[a]).await.unwrap().unwrap();

    let changed = Film {
        name: "Renamed".to_string(),
        ..film("Stalker", 8.1).with_id(id)
    };
    assert!(!repo.update_film(&changed, &[ActorId::new(404)]).await.unwrap());

    assert_eq!(repo.get_film_by_id(id).await.unwrap().unwrap().name, "Stalker");
    assert_eq!(repo.get_film_actor_ids(id).await.unwrap(), vec![a]);

    let missing = film("Ghost", 1.0).with_id(FilmId::new(9999));
    assert!(!repo.update_film(&missing, &[]).await.unwrap());
}

#[tokio::test]
async fn test_delete_film_clears_links() {
    let store = temp_store().await;
    let repo = store.film_repo();
    let a = add_actor(&store, "Erland", "Josephson").await;

    let id = repo.add_film(&film("Solaris", 8.0), &[a]).await.unwrap().unwrap();

    assert!(repo.delete_film(id).await.unwrap());
    assert!(repo.get_film_actor_ids(id).await.unwrap().is_empty());
    assert!(!repo.delete_film(id).await.unwrap());

    let actor = store.actor_repo().get_actor_by_id(a).await.unwrap().unwrap();
    assert!(actor.films.is_empty());
}

#[tokio::test]
async fn test_delete_actor_keeps_films() {
    let store = temp_store().await;
    let repo = store.film_repo();
    let a = add_actor(&store, "Erland", "Josephson").await;
    let b = add_actor(&store, "Susan", "Fleetwood").await;

    let id = repo.add_film(&film("Mirror", 8.1), &[a, b]).await.unwrap().unwrap();

    assert!(store.actor_repo().delete_actor(a).await.unwrap());
    assert!(!store.actor_repo().delete_actor(a).await.unwrap());
    assert_eq!(repo.get_film_actor_ids(id).await.unwrap(), vec![b]);
    assert!(repo.get_film_by_id(id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_search_is_case_insensitive_and_distinct() {
    let store = temp_store().await;
    let repo = store.film_repo();
    let a = add_actor(&store, "Erland", "Josephson").await;
    let b = add_actor(&store, "Erland", "Josephsson").await;

    repo.add_film(&film("Nostalghia", 8.0), &[a, b]).await.unwrap();
    repo.add_film(&film("100% Cinema", 5.0), &[]).await.unwrap();

    let found = repo.get_films_by_search("ERLAND JOSEPH").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Nostalghia");

    let found = repo.get_films_by_search("100%").await.unwrap();
    assert_eq!(found.len(), 1);

    assert!(repo.get_films_by_search("0% C_").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_users_are_unique_and_roles_change() {
    let store = temp_store().await;
    let repo = store.user_repo();

    let user = repo.create("andrei", "hash", Role::Default).await.unwrap().unwrap();
    assert!(repo.create("andrei", "other", Role::Admin).await.unwrap().is_none());

    assert!(repo.set_role(user.id, Role::Admin).await.unwrap());
    assert_eq!(repo.get_by_id(user.id).await.unwrap().unwrap().role, Role::Admin);
    assert!(!repo.set_role(UserId::new(777), Role::Admin).await.unwrap());

    let (found, hash) = repo
        .get_by_username_with_password("andrei")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(hash, "hash");
}

#[tokio::test]
async fn test_session_lifecycle_on_sqlite_store() {
    let store = temp_store().await;
    let session_store = SqliteStore::new(store.conn.get_sqlite_connection_pool().clone());
    session_store.migrate().await.unwrap();

    let sessions: Arc<dyn SessionRepository> =
        Arc::new(TowerSessionRepository::new(session_store));
    let service = DefaultSessionService::new(sessions.clone(), time::Duration::hours(24));

    let session = service.create_session(UserId::new(12)).await.unwrap();
    let loaded = service.get_session(&session.id).await.unwrap();
    assert_eq!(loaded, session);
    assert!(sessions.exists(&session.id).await.unwrap());

    assert!(service.delete_session(&session.id).await.unwrap());
    assert!(matches!(
        service.get_session(&session.id).await,
        Err(SessionError::NotFound)
    ));
    assert!(!service.delete_session(&session.id).await.unwrap());

    let expired = sessions
        .set(UserId::new(12), time::Duration::seconds(-5))
        .await
        .unwrap();
    assert!(sessions.get(&expired.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    let store = temp_store().await;
    let repo = store.film_repo();
    let actor = add_actor(&store, "Олег", "Янковский").await;

    let id = repo
        .add_film(&film("Ностальгия", 8.0), &[actor])
        .await
        .unwrap()
        .unwrap();

    for query in ["Ностальгия", "ностальгия", "НОСТАЛЬГ", "Олег Янковский", "олег ЯНК"] {
        let found = repo.get_films_by_search(query).await.unwrap();
        assert_eq!(found.len(), 1, "no match for {query}");
        assert_eq!(found[0].id, id);
    }
}

#[tokio::test]
async fn test_search_follows_renames() {
    let store = temp_store().await;
    let repo = store.film_repo();
    let actor = add_actor(&store, "Олег", "Янковский").await;

    let id = repo
        .add_film(&film("Зеркало", 8.1), &[actor])
        .await
        .unwrap()
        .unwrap();

    let renamed = Film {
        name: "Жертвоприношение".to_string(),
        ..film("Зеркало", 8.1).with_id(id)
    };
    assert!(repo.update_film(&renamed, &[actor]).await.unwrap());
    assert!(repo.get_films_by_search("зеркало").await.unwrap().is_empty());
    assert_eq!(repo.get_films_by_search("ЖЕРТВО").await.unwrap().len(), 1);

    let updated = store
        .actor_repo()
        .update_actor(
            &ActorInput {
                name: "Эрланд".to_string(),
                surname: "Юзефсон".to_string(),
                gender: Gender::Male,
                birthday: date(1923, 6, 15),
            }
            .with_id(actor),
        )
        .await
        .unwrap();
    assert!(updated);
    assert!(repo.get_films_by_search("янковский").await.unwrap().is_empty());
    assert_eq!(repo.get_films_by_search("Эрланд ЮЗЕФ").await.unwrap().len(), 1);
}
