use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use std::sync::Arc;

use super::validation::{
    parse_path_id, validate_film_add, validate_film_update, validate_search_text,
    validate_sort_param,
};
use super::{ApiError, ApiResponse, AppState, FilmListQuery, FilmRequest, ResultResponse};
use crate::domain::FilmId;
use crate::models::Film;
use crate::services::FilmError;

impl From<FilmError> for ApiError {
    fn from(err: FilmError) -> Self {
        match err {
            FilmError::NotFound | FilmError::NoSearchResults => Self::NotFound(err.to_string()),
            FilmError::BadAddData | FilmError::BadUpdateData => Self::BadRequest(err.to_string()),
            FilmError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

/// GET /api/v1/films?sort_param=rating|name|date_of_release
pub async fn list_films(
    State(state): State<Arc<AppState>>,
    query: Result<Query<FilmListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Film>>>, ApiError> {
    let Query(query) = query?;
    let sort = validate_sort_param(&query.sort_param)?;

    let films = state.film_service().get_films(sort).await?;
    Ok(Json(ApiResponse::success(films)))
}

/// GET /api/v1/film/{id}
pub async fn get_film(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Film>>, ApiError> {
    let id = FilmId::new(parse_path_id("film", &id)?);

    let film = state.film_service().get_film_by_id(id).await?;
    Ok(Json(ApiResponse::success(film)))
}

/// GET /api/v1/film/search/{text}
/// Matches the film name or any linked actor's full name.
pub async fn search_films(
    State(state): State<Arc<AppState>>,
    Path(text): Path<String>,
) -> Result<Json<ApiResponse<Vec<Film>>>, ApiError> {
    let text = validate_search_text(&text)?;

    let films = state.film_service().search_films(text).await?;
    Ok(Json(ApiResponse::success(films)))
}

/// POST /api/v1/admin/film
pub async fn add_film(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FilmRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Film>>, ApiError> {
    let Json(payload) = payload?;
    let (input, actor_ids) = validate_film_add(&payload)?;

    let film = state.film_service().add_film(input, &actor_ids).await?;
    Ok(Json(ApiResponse::success(film)))
}

/// PUT /api/v1/admin/film
/// Replaces the film's fields and its whole actor set.
pub async fn update_film(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FilmRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Film>>, ApiError> {
    let Json(payload) = payload?;
    let (film, actor_ids) = validate_film_update(&payload)?;

    state.film_service().update_film(&film, &actor_ids).await?;
    Ok(Json(ApiResponse::success(film)))
}

/// DELETE /api/v1/admin/film/{id}
pub async fn delete_film(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ResultResponse>>, ApiError> {
    let id = FilmId::new(parse_path_id("film", &id)?);

    state.film_service().delete_film(id).await?;
    Ok(Json(ApiResponse::success(ResultResponse::success())))
}
