use std::sync::Arc;

use axum::extract::Extension;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::AppendHeaders;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::api::auth::{clear_cookie_header, session_cookie_header, session_token, CurrentUser};
use crate::api::errors::{api_error, internal_error, ApiError};
use crate::config::Settings;
use crate::db::{Database, UserPublic, UserRepository};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

type SessionResponse = (AppendHeaders<[(axum::http::HeaderName, String); 1]>, Json<UserPublic>);

fn with_session_cookie(
    user: UserPublic,
    token: String,
    settings: &Settings,
) -> SessionResponse {
    let cookie = session_cookie_header(&token, settings.session_ttl_days, settings.cookie_secure);
    (AppendHeaders([(SET_COOKIE, cookie)]), Json(user))
}

#[axum::debug_handler]
pub async fn register(
    Extension(database): Extension<Database>,
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<SessionResponse, ApiError> {
    if !payload.email.contains('@') {
        return Err(api_error(StatusCode::BAD_REQUEST, "Invalid email address"));
    }
    if payload.password.chars().count() < 8 {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters",
        ));
    }

    let mut conn = database.get_conn().map_err(internal_error)?;
    let mut repo = UserRepository::new(&mut conn);
    let user = repo
        .create_user(&payload.email, &payload.password)
        .map_err(|err| api_error(StatusCode::CONFLICT, &err.to_string()))?;
    let token = repo
        .create_session(&user.id, settings.session_ttl_days)
        .map_err(internal_error)?;

    Ok(with_session_cookie(user, token, &settings))
}

#[axum::debug_handler]
pub async fn login(
    Extension(database): Extension<Database>,
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<LoginRequest>,
) -> Result<SessionResponse, ApiError> {
    let mut conn = database.get_conn().map_err(internal_error)?;
    let mut repo = UserRepository::new(&mut conn);
    let user = repo
        .authenticate_user(&payload.email, &payload.password)
        .map_err(internal_error)?
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Invalid email or password"))?;
    let token = repo
        .create_session(&user.id, settings.session_ttl_days)
        .map_err(internal_error)?;

    Ok(with_session_cookie(user, token, &settings))
}

#[axum::debug_handler]
pub async fn logout(
    CurrentUser(_user): CurrentUser,
    Extension(database): Extension<Database>,
    Extension(settings): Extension<Arc<Settings>>,
    headers: HeaderMap,
) -> Result<
    (
        AppendHeaders<[(axum::http::HeaderName, String); 1]>,
        Json<serde_json::Value>,
    ),
    ApiError,
> {
    if let Some(token) = session_token(&headers) {
        let mut conn = database.get_conn().map_err(internal_error)?;
        let mut repo = UserRepository::new(&mut conn);
        repo.delete_session(&token).map_err(internal_error)?;
    }

    Ok((
        AppendHeaders([(SET_COOKIE, clear_cookie_header(settings.cookie_secure))]),
        Json(json!({ "status": "ok" })),
    ))
}

#[axum::debug_handler]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserPublic> {
    Json(user)
}
