use anyhow::Context;
use std::sync::Arc;
use tokio::task;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::UserRepository;
use crate::db::repositories::user::{hash_password, verify_password};
use crate::domain::{Role, UserId};
use crate::models::User;
use crate::services::user_service::{UserError, UserService};

pub struct DefaultUserService {
    users: Arc<dyn UserRepository>,
    security: SecurityConfig,
}

impl DefaultUserService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, security: SecurityConfig) -> Self {
        Self { users, security }
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    async fn hash(&self, password: &str) -> Result<String, UserError> {
        let password = password.to_string();
        let config = self.security.clone();
        let hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;
        Ok(hash)
    }

    async fn create(&self, username: &str, password: &str, role: Role) -> Result<User, UserError> {
        let password_hash = self.hash(password).await?;
        self.users
            .create(username, &password_hash, role)
            .await?
            .ok_or(UserError::AlreadyExists)
    }
}

#[async_trait::async_trait]
impl UserService for DefaultUserService {
    async fn login(&self, username: &str, password: &str) -> Result<User, UserError> {
        let Some((user, password_hash)) =
            self.users.get_by_username_with_password(username).await?
        else {
            return Err(UserError::BadCredentials);
        };

        let password = password.to_string();
        let is_valid = task::spawn_blocking(move || verify_password(&password, &password_hash))
            .await
            .context("Password verification task panicked")??;

        if !is_valid {
            return Err(UserError::BadCredentials);
        }

        Ok(user)
    }

    async fn register(&self, username: &str, password: &str) -> Result<User, UserError> {
        if self
            .users
            .get_by_username_with_password(username)
            .await?
            .is_some()
        {
            return Err(UserError::AlreadyExists);
        }

        // A concurrent registration can still win the insert; `create` maps
        // the unique violation to `AlreadyExists`.
        let user = self.create(username, password, Role::Default).await?;
        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    async fn get_user_role(&self, user_id: UserId) -> Result<Role, UserError> {
        self.users
            .get_by_id(user_id)
            .await?
            .map(|user| user.role)
            .ok_or(UserError::NoUser)
    }

    async fn bootstrap_admin(&self, username: &str, password: &str) -> Result<User, UserError> {
        if let Some((mut user, _)) = self.users.get_by_username_with_password(username).await? {
            if !user.role.is_admin() {
                self.users.set_role(user.id, Role::Admin).await?;
                user.role = Role::Admin;
                info!(user_id = %user.id, username = %user.username, "User promoted to admin");
            }
            return Ok(user);
        }

        let user = self.create(username, password, Role::Admin).await?;
        info!(user_id = %user.id, username = %user.username, "Admin user created");
        Ok(user)
    }
}
