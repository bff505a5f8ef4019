use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use time::{Duration, OffsetDateTime};
use tower_sessions::SessionStore;
use tower_sessions::session::{Id, Record};

use crate::domain::UserId;
use crate::models::Session;

const USER_ID_KEY: &str = "user_id";

/// Key-value access to login sessions.
///
/// Every operation is single-key. A missing, expired or malformed token is a
/// miss (`None`/`false`), never an error.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Stores a fresh random token for `user_id` that expires after `ttl`.
    async fn set(&self, user_id: UserId, ttl: Duration) -> Result<Session>;

    async fn get(&self, token: &str) -> Result<Option<Session>>;

    async fn exists(&self, token: &str) -> Result<bool>;

    /// Returns whether a live session was removed.
    async fn delete(&self, token: &str) -> Result<bool>;
}

/// [`SessionRepository`] over any `tower_sessions` store. Expiry is enforced
/// by the store itself: expired records are never loaded.
#[derive(Debug, Clone)]
pub struct TowerSessionRepository<S> {
    store: S,
}

impl<S: SessionStore> TowerSessionRepository<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    async fn load(&self, token: &str) -> Result<Option<Record>> {
        let Ok(id) = token.parse::<Id>() else {
            return Ok(None);
        };

        self.store
            .load(&id)
            .await
            .context("Failed to load session")
    }
}

fn session_from_record(record: &Record) -> Result<Session> {
    let user_id = record
        .data
        .get(USER_ID_KEY)
        .and_then(serde_json::Value::as_i64)
        .and_then(|id| i32::try_from(id).ok())
        .ok_or_else(|| anyhow::anyhow!("Session record has no user id"))?;

    Ok(Session {
        id: record.id.to_string(),
        user_id: UserId::new(user_id),
    })
}

#[async_trait]
impl<S: SessionStore> SessionRepository for TowerSessionRepository<S> {
    async fn set(&self, user_id: UserId, ttl: Duration) -> Result<Session> {
        let mut record = Record {
            id: Id::default(),
            data: HashMap::from([(
                USER_ID_KEY.to_string(),
                serde_json::Value::from(user_id.value()),
            )]),
            expiry_date: OffsetDateTime::now_utc() + ttl,
        };

        // `create` re-rolls the id on collision.
        self.store
            .create(&mut record)
            .await
            .context("Failed to store session")?;

        Ok(Session {
            id: record.id.to_string(),
            user_id,
        })
    }

    async fn get(&self, token: &str) -> Result<Option<Session>> {
        self.load(token)
            .await?
            .as_ref()
            .map(session_from_record)
            .transpose()
    }

    async fn exists(&self, token: &str) -> Result<bool> {
        Ok(self.load(token).await?.is_some())
    }

    async fn delete(&self, token: &str) -> Result<bool> {
        let Some(record) = self.load(token).await? else {
            return Ok(false);
        };

        self.store
            .delete(&record.id)
            .await
            .context("Failed to delete session")?;

        Ok(true)
    }
}
