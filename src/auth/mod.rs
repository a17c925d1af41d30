//! Session token extraction.
//!
//! The browser carries its session either as a bearer token or as the
//! `session` cookie set at sign-in. Whether the token is valid, and whether
//! it belongs to a supervisor, is decided per page by the view controller.

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Cookie holding the session's access token.
pub const SESSION_COOKIE: &str = "session";

/// The raw session token of a request, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Attach the request's [`SessionToken`] as an extension.
pub async fn session_layer(mut request: Request, next: Next) -> Response {
    let token = session_token(request.headers());
    request.extensions_mut().insert(SessionToken(token));
    next.run(request).await
}

/// Bearer token first, then the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value storing a session token.
pub fn session_cookie(token: &str, max_age: Option<i64>) -> String {
    match max_age {
        Some(secs) => format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE, token, secs
        ),
        None => format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token),
    }
}

/// `Set-Cookie` value removing the session cookie.
pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
