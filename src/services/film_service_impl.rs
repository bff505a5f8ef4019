use std::sync::Arc;
use tracing::info;

use crate::db::FilmRepository;
use crate::domain::{ActorId, FilmId, FilmSort};
use crate::models::{Film, FilmInput};
use crate::services::film_service::{FilmError, FilmService};

pub struct DefaultFilmService {
    films: Arc<dyn FilmRepository>,
}

impl DefaultFilmService {
    #[must_use]
    pub fn new(films: Arc<dyn FilmRepository>) -> Self {
        Self { films }
    }
}

#[async_trait::async_trait]
impl FilmService for DefaultFilmService {
    async fn get_films(&self, sort: FilmSort) -> Result<Vec<Film>, FilmError> {
        Ok(self.films.get_films(sort).await?)
    }

    async fn get_film_by_id(&self, id: FilmId) -> Result<Film, FilmError> {
        self.films
            .get_film_by_id(id)
            .await?
            .ok_or(FilmError::NotFound)
    }

    async fn search_films(&self, text: &str) -> Result<Vec<Film>, FilmError> {
        let films = self.films.get_films_by_search(text).await?;
        if films.is_empty() {
            return Err(FilmError::NoSearchResults);
        }
        Ok(films)
    }

    async fn add_film(&self, film: FilmInput, actor_ids: &[ActorId]) -> Result<Film, FilmError> {
        let id = self
            .films
            .add_film(&film, actor_ids)
            .await?
            .ok_or(FilmError::BadAddData)?;

        info!(film_id = %id, actors = actor_ids.len(), "Film added");
        Ok(film.with_id(id))
    }

    async fn update_film(&self, film: &Film, actor_ids: &[ActorId]) -> Result<(), FilmError> {
        if !self.films.update_film(film, actor_ids).await? {
            return Err(FilmError::BadUpdateData);
        }
        info!(film_id = %film.id, actors = actor_ids.len(), "Film updated");
        Ok(())
    }

    async fn delete_film(&self, id: FilmId) -> Result<(), FilmError> {
        if !self.films.delete_film(id).await? {
            return Err(FilmError::NotFound);
        }
        info!(film_id = %id, "Film deleted");
        Ok(())
    }
}
