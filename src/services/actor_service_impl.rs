use std::sync::Arc;
use tracing::info;

use crate::db::ActorRepository;
use crate::domain::ActorId;
use crate::models::{Actor, ActorInput, ActorWithFilms};
use crate::services::actor_service::{ActorError, ActorService};

pub struct DefaultActorService {
    actors: Arc<dyn ActorRepository>,
}

impl DefaultActorService {
    #[must_use]
    pub fn new(actors: Arc<dyn ActorRepository>) -> Self {
        Self { actors }
    }
}

#[async_trait::async_trait]
impl ActorService for DefaultActorService {
    async fn get_actors(&self) -> Result<Vec<ActorWithFilms>, ActorError> {
        Ok(self.actors.get_actors().await?)
    }

    async fn get_actor_by_id(&self, id: ActorId) -> Result<ActorWithFilms, ActorError> {
        self.actors
            .get_actor_by_id(id)
            .await?
            .ok_or(ActorError::NotFound)
    }

    async fn add_actor(&self, actor: ActorInput) -> Result<Actor, ActorError> {
        let id = self.actors.add_actor(&actor).await?;
        info!(actor_id = %id, "Actor added");
        Ok(actor.with_id(id))
    }

    async fn update_actor(&self, actor: &Actor) -> Result<(), ActorError> {
        if !self.actors.update_actor(actor).await? {
            return Err(ActorError::BadUpdateData);
        }
        info!(actor_id = %actor.id, "Actor updated");
        Ok(())
    }

    async fn delete_actor(&self, id: ActorId) -> Result<(), ActorError> {
        if !self.actors.delete_actor(id).await? {
            return Err(ActorError::NotFound);
        }
        info!(actor_id = %id, "Actor deleted");
        Ok(())
    }
}
