//! Remote data gateway for the hosted database and auth service.
//!
//! Every computation the dashboard shows lives in stored procedures on the
//! hosted backend; this module only issues named, parameterized calls and
//! filtered table reads on behalf of the signed-in user.

mod query;
mod supabase;

pub use query::*;
pub use supabase::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Errors raised at the transport edge.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),
}

/// A signed-in session as returned by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

/// The auth-service identity behind a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Authenticated access to the hosted backend.
///
/// Calls are independent: no retries, no caching, no batching.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Invoke a named remote procedure with a JSON object of parameters.
    async fn rpc(&self, token: &str, function: &str, params: Value) -> Result<Value, GatewayError>;

    /// Run a filtered table read.
    async fn select(&self, token: &str, query: &TableQuery) -> Result<Vec<Value>, GatewayError>;

    /// Exchange a credential pair for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError>;

    /// Revoke a session.
    async fn sign_out(&self, token: &str) -> Result<(), GatewayError>;

    /// Resolve the identity behind a session token.
    async fn session_user(&self, token: &str) -> Result<AuthUser, GatewayError>;
}
