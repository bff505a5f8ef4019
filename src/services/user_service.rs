//! Domain service for user accounts: login, registration and role lookup.

use thiserror::Error;

use crate::domain::{Role, UserId};
use crate::models::User;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("bad auth data for user")]
    BadCredentials,

    #[error("user with such username already exists")]
    AlreadyExists,

    #[error("user not exists")]
    NoUser,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Checks a username/password pair.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::BadCredentials`] for an unknown user or a wrong
    /// password; the two cases are not distinguished.
    async fn login(&self, username: &str, password: &str) -> Result<User, UserError>;

    /// Creates a user with the default role.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::AlreadyExists`] if the username is taken.
    async fn register(&self, username: &str, password: &str) -> Result<User, UserError>;

    /// # Errors
    ///
    /// Returns [`UserError::NoUser`] if the user does not exist.
    async fn get_user_role(&self, user_id: UserId) -> Result<Role, UserError>;

    /// Creates an admin account, or promotes an existing user to admin.
    /// The password is only used when the account is created.
    async fn bootstrap_admin(&self, username: &str, password: &str) -> Result<User, UserError>;
}
