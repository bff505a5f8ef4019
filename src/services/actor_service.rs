use thiserror::Error;

use crate::domain::ActorId;
use crate::models::{Actor, ActorInput, ActorWithFilms};

#[derive(Debug, Error)]
pub enum ActorError {
    #[error("actor not found")]
    NotFound,

    #[error("bad update data")]
    BadUpdateData,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for ActorError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait ActorService: Send + Sync {
    async fn get_actors(&self) -> Result<Vec<ActorWithFilms>, ActorError>;

    async fn get_actor_by_id(&self, id: ActorId) -> Result<ActorWithFilms, ActorError>;

    async fn add_actor(&self, actor: ActorInput) -> Result<Actor, ActorError>;

    /// # Errors
    ///
    /// Returns [`ActorError::BadUpdateData`] if no actor has the id.
    async fn update_actor(&self, actor: &Actor) -> Result<(), ActorError>;

    async fn delete_actor(&self, id: ActorId) -> Result<(), ActorError>;
}
