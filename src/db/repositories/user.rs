use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr, sea_query::Expr,
};

use crate::config::SecurityConfig;
use crate::domain::{Role, UserId};
use crate::entities::users;
use crate::models::User;

impl TryFrom<users::Model> for User {
    type Error = anyhow::Error;

    fn try_from(model: users::Model) -> Result<Self> {
        let role: Role = model
            .role
            .parse()
            .with_context(|| format!("User {} has a corrupt role", model.id))?;

        Ok(Self {
            id: UserId::new(model.id),
            username: model.username,
            role,
        })
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>>;

    /// Get user by username together with its password hash (for login)
    async fn get_by_username_with_password(&self, username: &str)
    -> Result<Option<(User, String)>>;

    /// Inserts a user. Returns `None` if the username is already taken.
    async fn create(&self, username: &str, password_hash: &str, role: Role)
    -> Result<Option<User>>;

    async fn set_role(&self, id: UserId, role: Role) -> Result<bool>;
}

pub struct SeaOrmUserRepository {
    conn: DatabaseConnection,
}

impl SeaOrmUserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        user.map(User::try_from).transpose()
    }

    async fn get_by_username_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        user.map(|u| {
            let password_hash = u.password_hash.clone();
            User::try_from(u).map(|user| (user, password_hash))
        })
        .transpose()
    }

    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<User>> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = users::Entity::insert(users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.as_str().to_string()),
            created_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await;

        match result {
            Ok(inserted) => Ok(Some(User {
                id: UserId::new(inserted.last_insert_id),
                username: username.to_string(),
                role,
            })),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to insert user"),
        }
    }

    async fn set_role(&self, id: UserId, role: Role) -> Result<bool> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Role, Expr::value(role.as_str()))
            .filter(users::Column::Id.eq(id.value()))
            .exec(&self.conn)
            .await
            .context("Failed to update user role")?;

        Ok(result.rows_affected > 0)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the argon2 crate defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = argon2_for(config)?;

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify a password against a PHC hash string. The params are read from the
/// hash itself, so hashes made under older settings still verify.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn argon2_for(config: Option<&SecurityConfig>) -> Result<Argon2<'static>> {
    let Some(cfg) = config else {
        return Ok(Argon2::default());
    };

    let params = Params::new(
        cfg.argon2_memory_cost_kib,
        cfg.argon2_time_cost,
        cfg.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}
