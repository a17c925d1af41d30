//! Session boundary: sign-in, sign-out and resolving the current user.

use crate::errors::AppError;
use crate::gateway::{AuthSession, GatewayError, TableQuery};
use crate::models::UserAccount;

use super::Repository;

impl Repository {
    /// The `usuarios` row behind a session token.
    pub async fn current_user(&self, token: &str) -> Result<UserAccount, AppError> {
        let auth_user = self.gateway.session_user(token).await?;

        let query = TableQuery::table("usuarios").eq("id", auth_user.id).limit(1);
        let mut users: Vec<UserAccount> = self.read(token, &query).await?;
        if users.is_empty() {
            return Err(AppError::Unauthorized(format!(
                "No user profile for {}",
                auth_user.id
            )));
        }
        Ok(users.swap_remove(0))
    }

    /// Sign in with a credential pair; only supervisors keep their session.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(AuthSession, UserAccount), AppError> {
        let session = self
            .gateway
            .sign_in(email, password)
            .await
            .map_err(|e| match e {
                GatewayError::Backend { message, .. } | GatewayError::Unauthorized(message) => {
                    AppError::Unauthorized(message)
                }
                other => AppError::from(other),
            })?;

        let user = self.current_user(&session.access_token).await?;
        if !user.is_supervisor() {
            tracing::warn!(user_id = %user.id, "Non-supervisor sign-in refused");
            if let Err(e) = self.gateway.sign_out(&session.access_token).await {
                tracing::warn!("Failed to revoke refused session: {}", e);
            }
            return Err(AppError::Forbidden(
                "Access denied. Only supervisors can sign in.".to_string(),
            ));
        }

        tracing::info!(user_id = %user.id, "Supervisor signed in");
        Ok((session, user))
    }

    pub async fn sign_out(&self, token: &str) -> Result<(), AppError> {
        self.gateway.sign_out(token).await?;
        Ok(())
    }
}
