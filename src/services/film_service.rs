//! Domain service for the film catalog.

use thiserror::Error;

use crate::domain::{ActorId, FilmId, FilmSort};
use crate::models::{Film, FilmInput};

#[derive(Debug, Error)]
pub enum FilmError {
    #[error("film not found")]
    NotFound,

    #[error("films not found")]
    NoSearchResults,

    #[error("bad add data")]
    BadAddData,

    #[error("bad update data")]
    BadUpdateData,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for FilmError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait FilmService: Send + Sync {
    async fn get_films(&self, sort: FilmSort) -> Result<Vec<Film>, FilmError>;

    /// # Errors
    ///
    /// Returns [`FilmError::NotFound`] if no film has the id.
    async fn get_film_by_id(&self, id: FilmId) -> Result<Film, FilmError>;

    /// # Errors
    ///
    /// Returns [`FilmError::NoSearchResults`] when nothing matches; an empty
    /// answer is never returned as `Ok`.
    async fn search_films(&self, text: &str) -> Result<Vec<Film>, FilmError>;

    /// # Errors
    ///
    /// Returns [`FilmError::BadAddData`] if any actor id does not exist. No
    /// film is created in that case.
    async fn add_film(&self, film: FilmInput, actor_ids: &[ActorId]) -> Result<Film, FilmError>;

    /// # Errors
    ///
    /// Returns [`FilmError::BadUpdateData`] if the film or any actor id does
    /// not exist. Nothing is changed in that case.
    async fn update_film(&self, film: &Film, actor_ids: &[ActorId]) -> Result<(), FilmError>;

    /// # Errors
    ///
    /// Returns [`FilmError::NotFound`] if no film has the id.
    async fn delete_film(&self, id: FilmId) -> Result<(), FilmError>;
}
