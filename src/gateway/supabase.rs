//! HTTP implementation of the gateway against a hosted Postgres REST and auth service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};

use super::{AuthSession, AuthUser, DataGateway, GatewayError, TableQuery};

/// Gateway that speaks the hosted backend's REST (`/rest/v1`) and auth (`/auth/v1`) APIs.
#[derive(Clone)]
pub struct SupabaseGateway {
    http_client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseGateway {
    /// Creates a gateway; `timeout` overrides the transport default when set.
    pub fn new(
        base_url: &str,
        anon_key: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| GatewayError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    fn authorized(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

        tracing::debug!(status = status.as_u16(), %message, "Backend call failed");

        // 403 is a row-level permission refusal, not a dead session
        if status == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthorized(message));
        }
        Err(GatewayError::Backend {
            status: status.as_u16(),
            message,
        })
    }

    async fn json(response: Response) -> Result<Value, GatewayError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        // Procedures returning void answer with an empty body
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DataGateway for SupabaseGateway {
    async fn rpc(&self, token: &str, function: &str, params: Value) -> Result<Value, GatewayError> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, function);
        tracing::debug!(function, "Calling remote procedure");

        let request = self.authorized(self.http_client.post(url), token).json(&params);
        let response = self.send(request).await?;
        Self::json(response).await
    }

    async fn select(&self, token: &str, query: &TableQuery) -> Result<Vec<Value>, GatewayError> {
        let url = format!("{}/rest/v1/{}", self.base_url, query.table);
        tracing::debug!(table = %query.table, "Reading table");

        let request = self
            .authorized(self.http_client.get(url), token)
            .query(&query.query_pairs());
        let response = self.send(request).await?;

        match Self::json(response).await? {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            other => Err(GatewayError::Decode(format!(
                "Expected an array of rows, got {}",
                other
            ))),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);

        let request = self
            .http_client
            .post(url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }));
        let response = self.send(request).await?;
        let body = Self::json(response).await?;

        serde_json::from_value(body).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    async fn sign_out(&self, token: &str) -> Result<(), GatewayError> {
        let url = format!("{}/auth/v1/logout", self.base_url);
        let request = self.authorized(self.http_client.post(url), token);
        self.send(request).await?;
        Ok(())
    }

    async fn session_user(&self, token: &str) -> Result<AuthUser, GatewayError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let request = self.authorized(self.http_client.get(url), token);
        let response = self.send(request).await?;
        let body = Self::json(response).await?;

        serde_json::from_value(body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

/// Pull the human-readable message out of a REST or auth error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error_description", "msg", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        extract::{Path, Query},
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{get, post},
        Json, Router,
    };
    use std::collections::HashMap;

    async fn spawn_backend() -> String {
        let app = Router::new()
            .route(
                "/rest/v1/rpc/{function}",
                post(
                    |Path(function): Path<String>, headers: HeaderMap, Json(params): Json<Value>| async move {
                        if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some("anon") {
                            return (AxumStatus::UNAUTHORIZED, Json(json!({ "message": "No API key found" })));
                        }
                        match function.as_str() {
                            "obtener_tendencia_diaria" => (
                                AxumStatus::OK,
                                Json(json!([{ "fecha": "2024-03-05", "dias": params["dias"] }])),
                            ),
                            "solo_administradores" => (
                                AxumStatus::FORBIDDEN,
                                Json(json!({
                                    "code": "42501",
                                    "message": "permission denied for function solo_administradores"
                                })),
                            ),
                            _ => (
                                AxumStatus::BAD_REQUEST,
                                Json(json!({ "code": "P0001", "message": "El activo no existe" })),
                            ),
                        }
                    },
                ),
            )
            .route(
                "/rest/v1/activos",
                get(|Query(params): Query<HashMap<String, String>>, headers: HeaderMap| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    Json(json!([{ "order": params.get("order"), "auth": auth }]))
                }),
            )
            .route(
                "/auth/v1/token",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] == "secret" {
                        (
                            AxumStatus::OK,
                            Json(json!({
                                "access_token": "tok",
                                "refresh_token": "ref",
                                "expires_in": 3600,
                                "user": { "id": "6f1c7b8e-2d4a-4a8e-9a51-1f0d2b3c4d5e", "email": "sup@example.com" }
                            })),
                        )
                    } else {
                        (
                            AxumStatus::BAD_REQUEST,
                            Json(json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" })),
                        )
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_rpc_posts_params() {
        let url = spawn_backend().await;
        let gateway = SupabaseGateway::new(&url, "anon", None).unwrap();

        let value = gateway
            .rpc("tok", "obtener_tendencia_diaria", json!({ "dias": 30 }))
            .await
            .unwrap();
        assert_eq!(value[0]["dias"], 30);
    }

    #[tokio::test]
    async fn test_rpc_error_message_is_verbatim() {
        let url = spawn_backend().await;
        let gateway = SupabaseGateway::new(&url, "anon", None).unwrap();

        let err = gateway
            .rpc("tok", "cambiar_estado_activo", json!({}))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::Backend {
                status: 400,
                message: "El activo no existe".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_forbidden_stays_a_backend_error() {
        let url = spawn_backend().await;
        let gateway = SupabaseGateway::new(&url, "anon", None).unwrap();

        let err = gateway
            .rpc("tok", "solo_administradores", json!({}))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::Backend {
                status: 403,
                message: "permission denied for function solo_administradores".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_is_unauthorized() {
        let url = spawn_backend().await;
        let gateway = SupabaseGateway::new(&url, "wrong", None).unwrap();

        let err = gateway
            .rpc("tok", "obtener_tendencia_diaria", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_select_sends_query_and_token() {
        let url = spawn_backend().await;
        let gateway = SupabaseGateway::new(&url, "anon", None).unwrap();

        let rows = gateway
            .select("tok", &TableQuery::table("activos").order("nombre", true))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["order"], "nombre.asc");
        assert_eq!(rows[0]["auth"], "Bearer tok");
    }

    #[tokio::test]
    async fn test_sign_in() {
        let url = spawn_backend().await;
        let gateway = SupabaseGateway::new(&url, "anon", None).unwrap();

        let session = gateway.sign_in("sup@example.com", "secret").await.unwrap();
        assert_eq!(session.access_token, "tok");
        assert_eq!(session.user.email.as_deref(), Some("sup@example.com"));

        let err = gateway.sign_in("sup@example.com", "nope").await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::Backend {
                status: 400,
                message: "Invalid login credentials".to_string()
            }
        );
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(r#"{"msg":"bad jwt"}"#).as_deref(), Some("bad jwt"));
        assert_eq!(error_message("not json"), None);
        assert_eq!(error_message(r#"{"code":1}"#).as_deref(), Some(r#"{"code":1}"#));
    }
}
