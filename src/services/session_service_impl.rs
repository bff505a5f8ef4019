use std::sync::Arc;
use time::Duration;
use tracing::debug;

use crate::db::SessionRepository;
use crate::domain::UserId;
use crate::models::Session;
use crate::services::session_service::{SessionError, SessionService};

pub struct DefaultSessionService {
    sessions: Arc<dyn SessionRepository>,
    ttl: Duration,
}

impl DefaultSessionService {
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionRepository>, ttl: Duration) -> Self {
        Self { sessions, ttl }
    }
}

#[async_trait::async_trait]
impl SessionService for DefaultSessionService {
    async fn create_session(&self, user_id: UserId) -> Result<Session, SessionError> {
        let session = self.sessions.set(user_id, self.ttl).await?;
        debug!(user_id = %user_id, "Session created");
        Ok(session)
    }

    async fn get_session(&self, token: &str) -> Result<Session, SessionError> {
        self.sessions
            .get(token)
            .await?
            .ok_or(SessionError::NotFound)
    }

    async fn delete_session(&self, token: &str) -> Result<bool, SessionError> {
        Ok(self.sessions.delete(token).await?)
    }
}
