//! Domain service for login sessions.
//!
//! Issues opaque tokens bound to a user id, resolves them back, and revokes
//! them on logout. Expiry is left to the session store.

use thiserror::Error;

use crate::domain::UserId;
use crate::models::Session;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,

    #[error("Session store unavailable: {0}")]
    Store(String),
}

impl From<anyhow::Error> for SessionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait SessionService: Send + Sync {
    /// Starts a new session for the user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the store write fails.
    async fn create_session(&self, user_id: UserId) -> Result<Session, SessionError>;

    /// Resolves a token to its session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for an unknown, expired or malformed
    /// token.
    async fn get_session(&self, token: &str) -> Result<Session, SessionError>;

    /// Revokes a session. `Ok(false)` means there was nothing to revoke.
    async fn delete_session(&self, token: &str) -> Result<bool, SessionError>;
}
