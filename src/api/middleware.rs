//! Per-request middleware: request identity, authentication and the admin
//! role gate.
//!
//! `request_init` wraps every route. `authenticate` and `authorize` are
//! attached with `route_layer`, and admin routers add `authorize` before
//! `authenticate` so that authentication runs first.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tower_sessions::cookie::Cookie;
use tracing::{Instrument, info_span, warn};
use uuid::Uuid;

use super::{ApiError, AppState};
use crate::domain::UserId;
use crate::services::{SessionError, UserError};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Identity of the request being served. Inserted by [`request_init`].
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
}

/// The session owner. Inserted by [`authenticate`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub session_id: String,
}

pub async fn request_init(mut req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
        user_id = tracing::field::Empty,
    );

    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });

    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Reads the named cookie from the `Cookie` headers.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if req.extensions().get::<RequestContext>().is_none() {
        return Err(ApiError::internal(
            "authenticate ran without a request context",
        ));
    }

    let cookie_name = &state.config().session.cookie_name;
    let token = session_token(req.headers(), cookie_name)
        .ok_or_else(|| ApiError::unauthorized("no session cookie"))?;

    let session = match state.session_service().get_session(&token).await {
        Ok(session) => session,
        Err(SessionError::NotFound) => {
            warn!("Rejected unknown or expired session");
            return Err(ApiError::unauthorized("no session"));
        }
        Err(SessionError::Store(e)) => {
            return Err(ApiError::internal(format!("Session lookup failed: {e}")));
        }
    };

    tracing::Span::current().record("user_id", session.user_id.value());

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: session.user_id,
        session_id: session.id,
    });

    Ok(next.run(req).await)
}

pub async fn authorize(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = req
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|user| user.user_id)
        .ok_or_else(|| ApiError::internal("authorize ran without an authenticated user"))?;

    let role = match state.user_service().get_user_role(user_id).await {
        Ok(role) => role,
        Err(UserError::NoUser) => return Err(ApiError::unauthorized("user not exists")),
        Err(e) => return Err(ApiError::internal(format!("Role lookup failed: {e}"))),
    };

    if !role.is_admin() {
        warn!(user_id = user_id.value(), "Non-admin user denied");
        return Err(ApiError::Forbidden("admin role required".to_string()));
    }

    Ok(next.run(req).await)
}
