use anyhow::Context;
use std::sync::Arc;
use tower_sessions::MemoryStore;
use tower_sessions_sqlx_store::SqliteStore;
use tracing::info;

use crate::config::{Config, SessionBackend};
use crate::db::{SessionRepository, Store, TowerSessionRepository};
use crate::services::{
    ActorService, DefaultActorService, DefaultFilmService, DefaultSessionService,
    DefaultUserService, FilmService, SessionService, UserService,
};

/// Everything a request handler can reach, wired once at startup.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub session_service: Arc<dyn SessionService>,

    pub user_service: Arc<dyn UserService>,

    pub film_service: Arc<dyn FilmService>,

    pub actor_service: Arc<dyn ActorService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let sessions = build_session_repository(&config, &store).await?;

        let session_service = Arc::new(DefaultSessionService::new(sessions, config.session.ttl()))
            as Arc<dyn SessionService>;

        let user_service = Arc::new(DefaultUserService::new(
            Arc::new(store.user_repo()),
            config.security.clone(),
        )) as Arc<dyn UserService>;

        let film_service =
            Arc::new(DefaultFilmService::new(Arc::new(store.film_repo()))) as Arc<dyn FilmService>;

        let actor_service = Arc::new(DefaultActorService::new(Arc::new(store.actor_repo())))
            as Arc<dyn ActorService>;

        Ok(Self {
            config: Arc::new(config),
            store,
            session_service,
            user_service,
            film_service,
            actor_service,
        })
    }
}

async fn build_session_repository(
    config: &Config,
    store: &Store,
) -> anyhow::Result<Arc<dyn SessionRepository>> {
    let repository: Arc<dyn SessionRepository> = match config.session.backend {
        SessionBackend::Memory => {
            info!("Using in-memory session store");
            Arc::new(TowerSessionRepository::new(MemoryStore::default()))
        }
        SessionBackend::Sqlite => {
            let pool = store.conn.get_sqlite_connection_pool().clone();
            let session_store = SqliteStore::new(pool);
            session_store
                .migrate()
                .await
                .context("Failed to migrate session store")?;
            info!("Using SQLite session store");
            Arc::new(TowerSessionRepository::new(session_store))
        }
    };

    Ok(repository)
}
