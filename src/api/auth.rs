use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_sessions::cookie::{Cookie, SameSite};
use tracing::info;

use super::middleware::AuthenticatedUser;
use super::validation::validate_credentials;
use super::{ApiError, ApiResponse, AppState, AuthRequest, ResultResponse, SessionResponse};
use crate::config::Config;
use crate::models::User;
use crate::services::{SessionError, UserError};

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::BadCredentials | UserError::NoUser => Self::Unauthorized(err.to_string()),
            UserError::AlreadyExists => Self::ValidationError(err.to_string()),
            UserError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound => Self::Unauthorized("no session".to_string()),
            SessionError::Store(msg) => Self::InternalError(msg),
        }
    }
}

// ============================================================================
// Cookies
// ============================================================================

fn session_cookie(config: &Config, value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((config.session.cookie_name.clone(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.server.secure_cookies)
        .max_age(max_age)
        .build()
}

fn expired_session_cookie(config: &Config) -> Cookie<'static> {
    session_cookie(config, String::new(), time::Duration::ZERO)
}

/// Opens a session for `user` and answers with its id, both in the body and
/// as the session cookie.
async fn start_session(state: &AppState, user: &User) -> Result<Response, ApiError> {
    let session = state.session_service().create_session(user.id).await?;

    let config = state.config();
    let cookie = session_cookie(config, session.id.clone(), config.session.ttl());

    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        Json(ApiResponse::success(SessionResponse {
            session_id: session.id,
        })),
    )
        .into_response())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    validate_credentials(&payload)?;

    let user = state
        .user_service()
        .login(&payload.username, &payload.password)
        .await?;

    info!(user_id = user.id.value(), "User logged in");
    start_session(&state, &user).await
}

/// POST /api/v1/register
/// Creates a user with the default role and logs it in.
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    validate_credentials(&payload)?;

    let user = state
        .user_service()
        .register(&payload.username, &payload.password)
        .await?;

    start_session(&state, &user).await
}

/// POST /api/v1/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Response, ApiError> {
    let deleted = state
        .session_service()
        .delete_session(&user.session_id)
        .await?;

    let clear = [(
        header::SET_COOKIE,
        expired_session_cookie(state.config()).to_string(),
    )];

    if !deleted {
        // Expired between authentication and now.
        return Ok((
            StatusCode::NOT_FOUND,
            clear,
            Json(ApiResponse::<()>::error("no session with session id")),
        )
            .into_response());
    }

    info!(user_id = user.user_id.value(), "User logged out");
    Ok((clear, Json(ApiResponse::success(ResultResponse::success()))).into_response())
}
