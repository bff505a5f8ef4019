use axum::{
    Router,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::db::Store;
use crate::services::{ActorService, FilmService, SessionService, UserService};
use crate::state::SharedState;

mod actors;
mod auth;
mod error;
mod films;
pub mod middleware;
mod observability;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<Config> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn session_service(&self) -> &Arc<dyn SessionService> {
        &self.shared.session_service
    }

    #[must_use]
    pub fn user_service(&self) -> &Arc<dyn UserService> {
        &self.shared.user_service
    }

    #[must_use]
    pub fn film_service(&self) -> &Arc<dyn FilmService> {
        &self.shared.film_service
    }

    #[must_use]
    pub fn actor_service(&self) -> &Arc<dyn ActorService> {
        &self.shared.actor_service
    }
}

/// Wraps the shared state for the HTTP layer and ensures the configured
/// bootstrap admin exists.
pub async fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    if let Some(admin) = &shared.config.security.bootstrap_admin {
        let user = shared
            .user_service
            .bootstrap_admin(&admin.username, &admin.password)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bootstrap admin: {e}"))?;
        info!(user_id = user.id.value(), username = %user.username, "Bootstrap admin ready");
    }

    Ok(Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    create_app_state(shared, prometheus_handle).await
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let public_routes = Router::new()
        .route("/films", get(films::list_films))
        .route("/film/{id}", get(films::get_film))
        .route("/film/search/{text}", get(films::search_films))
        .route("/actors", get(actors::list_actors))
        .route("/actor/{id}", get(actors::get_actor))
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/health", get(system::health));

    let session_routes = Router::new()
        .route("/logout", post(auth::logout))
        .route_layer(from_fn_with_state(state.clone(), middleware::authenticate));

    // The last route_layer runs first: authenticate, then authorize.
    let admin_routes = Router::new()
        .route(
            "/admin/film",
            post(films::add_film).put(films::update_film),
        )
        .route("/admin/film/{id}", delete(films::delete_film))
        .route(
            "/admin/actor",
            post(actors::add_actor).put(actors::update_actor),
        )
        .route("/admin/actor/{id}", delete(actors::delete_actor))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(from_fn_with_state(state.clone(), middleware::authorize))
        .route_layer(from_fn_with_state(state.clone(), middleware::authenticate));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(admin_routes)
        .fallback(route_not_found)
        .with_state(state);

    let cors_layer = if cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api/v1", api_router)
        .fallback(route_not_found)
        .layer(from_fn(observability::security_headers_middleware))
        .layer(from_fn(observability::access_log))
        .layer(from_fn(middleware::request_init))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("route not found".to_string())
}
