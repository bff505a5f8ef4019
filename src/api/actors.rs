use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use std::sync::Arc;

use super::validation::{parse_path_id, validate_actor_add, validate_actor_update};
use super::{ActorRequest, ApiError, ApiResponse, AppState, ResultResponse};
use crate::domain::ActorId;
use crate::models::{Actor, ActorWithFilms};
use crate::services::ActorError;

impl From<ActorError> for ApiError {
    fn from(err: ActorError) -> Self {
        match err {
            ActorError::NotFound => Self::NotFound(err.to_string()),
            ActorError::BadUpdateData => Self::BadRequest(err.to_string()),
            ActorError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

/// GET /api/v1/actors
pub async fn list_actors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ActorWithFilms>>>, ApiError> {
    let actors = state.actor_service().get_actors().await?;
    Ok(Json(ApiResponse::success(actors)))
}

/// GET /api/v1/actor/{id}
pub async fn get_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ActorWithFilms>>, ApiError> {
    let id = ActorId::new(parse_path_id("actor", &id)?);

    let actor = state.actor_service().get_actor_by_id(id).await?;
    Ok(Json(ApiResponse::success(actor)))
}

/// POST /api/v1/admin/actor
pub async fn add_actor(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ActorRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Actor>>, ApiError> {
    let Json(payload) = payload?;
    let input = validate_actor_add(&payload)?;

    let actor = state.actor_service().add_actor(input).await?;
    Ok(Json(ApiResponse::success(actor)))
}

/// PUT /api/v1/admin/actor
pub async fn update_actor(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ActorRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Actor>>, ApiError> {
    let Json(payload) = payload?;
    let actor = validate_actor_update(&payload)?;

    state.actor_service().update_actor(&actor).await?;
    Ok(Json(ApiResponse::success(actor)))
}

/// DELETE /api/v1/admin/actor/{id}
/// Also unlinks the actor from every film.
pub async fn delete_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ResultResponse>>, ApiError> {
    let id = ActorId::new(parse_path_id("actor", &id)?);

    state.actor_service().delete_actor(id).await?;
    Ok(Json(ApiResponse::success(ResultResponse::success())))
}
