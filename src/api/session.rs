//! Sign-in, sign-out and current-user endpoints.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use super::{success, ApiError, ApiResponse, ApiResult};
use crate::auth::{expired_session_cookie, session_cookie, SessionToken};
use crate::errors::AppError;
use crate::models::UserAccount;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub user: UserAccount,
    pub access_token: String,
    pub expires_in: Option<i64>,
}

/// POST /api/session - Sign in. Only supervisors get a session.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        return Err(AppError::Validation("Email and password are required".to_string()).into());
    }

    let (session, user) = state.repo.sign_in(email, &request.password).await?;
    let cookie = session_cookie(&session.access_token, session.expires_in);

    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiResponse::new(SignInResponse {
            user,
            access_token: session.access_token,
            expires_in: session.expires_in,
        }),
    ))
}

/// GET /api/session - The signed-in supervisor.
pub async fn current_session(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> ApiResult<UserAccount> {
    let token = token
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("Not signed in".to_string()))?;
    let user = state.repo.current_user(token).await?;
    if !user.is_supervisor() {
        return Err(AppError::Forbidden("Only supervisors can use the dashboard".to_string()).into());
    }
    success(user)
}

/// DELETE /api/session - Sign out and clear the session cookie.
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> impl IntoResponse {
    if let Some(token) = token.as_deref() {
        if let Err(e) = state.repo.sign_out(token).await {
            tracing::warn!("Sign-out failed, clearing cookie anyway: {}", e);
        }
    }
    ([(header::SET_COOKIE, expired_session_cookie())], ApiResponse::new(()))
}
