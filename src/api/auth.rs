//! Session-cookie authentication for the API.
//!
//! Sessions are opaque random tokens stored server-side and delivered in an
//! http-only cookie. Handlers take a [`CurrentUser`] argument to require
//! authentication; the extractor resolves the cookie against the store.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};

use crate::api::errors::{api_error, ApiError};
use crate::db::{Database, UserPublic, UserRepository};

pub const SESSION_COOKIE: &str = "session_token";

/// The authenticated principal of a request.
pub struct CurrentUser(pub UserPublic);

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// The raw session token of a request, if any. Used by logout, which needs
/// the token itself rather than the resolved user.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE)
}

/// Set-Cookie value for a fresh session.
pub fn session_cookie_header(token: &str, ttl_days: i64, secure: bool) -> String {
    let max_age_seconds = ttl_days * 24 * 60 * 60;
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, token, max_age_seconds
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set-Cookie value that expires the session cookie immediately.
pub fn clear_cookie_header(secure: bool) -> String {
    let mut cookie = format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let database = parts.extensions.get::<Database>().cloned().ok_or_else(|| {
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Database not configured")
        })?;

        let token = cookie_value(&parts.headers, SESSION_COOKIE)
            .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Not authenticated"))?;

        let mut conn = database
            .get_conn()
            .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;
        let mut repo = UserRepository::new(&mut conn);
        let user = repo
            .get_user_by_session(&token)
            .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?
            .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Session expired or invalid"))?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_parsing_finds_the_session_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; session_token=abc123; other=1"),
        );
        assert_eq!(session_token(&headers), Some("abc123".to_string()));

        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn cookie_headers_carry_expected_attributes() {
        let set = session_cookie_header("tok", 7, false);
        assert!(set.starts_with("session_token=tok;"));
        assert!(set.contains("HttpOnly"));
        assert!(set.contains("Max-Age=604800"));
        assert!(!set.contains("Secure"));

        let secure = session_cookie_header("tok", 7, true);
        assert!(secure.ends_with("Secure"));

        let clear = clear_cookie_header(false);
        assert!(clear.contains("Max-Age=0"));
    }
}
