//! In-memory gateway used by unit and integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::gateway::{AuthSession, AuthUser, DataGateway, FilterOp, GatewayError, TableQuery};
use crate::models::{Role, UserAccount};
use crate::repository::Repository;

pub const SUPERVISOR_TOKEN: &str = "supervisor-token";
pub const OPERATOR_TOKEN: &str = "operator-token";

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Rpc { function: String, params: Value },
    Select(TableQuery),
    SignIn(String),
    SignOut(String),
    SessionUser(String),
}

impl Call {
    /// Anything other than resolving who is behind a session.
    pub fn is_data_fetch(&self) -> bool {
        match self {
            Call::Rpc { .. } => true,
            Call::Select(query) => {
                !(query.table == "usuarios"
                    && query
                        .filters
                        .iter()
                        .all(|f| f.column == "id" && f.op == FilterOp::Eq))
            }
            _ => false,
        }
    }
}

#[derive(Default)]
pub struct FakeGateway {
    rpc: Mutex<HashMap<String, Result<Value, GatewayError>>>,
    tables: Mutex<HashMap<String, Result<Vec<Value>, GatewayError>>>,
    sessions: Mutex<HashMap<String, AuthUser>>,
    passwords: Mutex<HashMap<String, (String, String)>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeGateway {
    pub fn set_rpc(&self, function: &str, value: Value) {
        self.rpc
            .lock()
            .unwrap()
            .insert(function.to_string(), Ok(value));
    }

    pub fn fail_rpc(&self, function: &str, error: GatewayError) {
        self.rpc
            .lock()
            .unwrap()
            .insert(function.to_string(), Err(error));
    }

    pub fn set_table(&self, table: &str, rows: Vec<Value>) {
        self.tables
            .lock()
            .unwrap()
            .insert(table.to_string(), Ok(rows));
    }

    pub fn fail_table(&self, table: &str, error: GatewayError) {
        self.tables
            .lock()
            .unwrap()
            .insert(table.to_string(), Err(error));
    }

    /// Register a session token for a user and add the user's profile row.
    pub fn add_user(&self, token: &str, user: &UserAccount, password: Option<&str>) {
        self.sessions.lock().unwrap().insert(
            token.to_string(),
            AuthUser {
                id: user.id,
                email: user.email.clone(),
            },
        );
        if let (Some(email), Some(password)) = (&user.email, password) {
            self.passwords.lock().unwrap().insert(
                email.clone(),
                (password.to_string(), token.to_string()),
            );
        }

        let role = match user.role {
            Role::Supervisor => "SUPERVISOR",
            Role::Operator => "OPERADOR",
            Role::Unknown => "OTRO",
        };
        let mut tables = self.tables.lock().unwrap();
        let entry = tables
            .entry("usuarios".to_string())
            .or_insert_with(|| Ok(Vec::new()));
        if let Ok(rows) = entry {
            rows.push(json!({
                "id": user.id,
                "nombre_completo": user.full_name,
                "rol": role,
                "email": user.email,
            }));
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn data_fetches(&self) -> usize {
        self.calls().iter().filter(|c| c.is_data_fetch()).count()
    }

    pub fn rpc_calls(&self, function: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Rpc { function: f, params } if f == function => Some(params),
                _ => None,
            })
            .collect()
    }

    pub fn selects(&self, table: &str) -> Vec<TableQuery> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Select(q) if q.table == table => Some(q),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl DataGateway for FakeGateway {
    async fn rpc(&self, _token: &str, function: &str, params: Value) -> Result<Value, GatewayError> {
        self.record(Call::Rpc {
            function: function.to_string(),
            params,
        });
        self.rpc
            .lock()
            .unwrap()
            .get(function)
            .cloned()
            .unwrap_or(Ok(Value::Null))
    }

    async fn select(&self, _token: &str, query: &TableQuery) -> Result<Vec<Value>, GatewayError> {
        self.record(Call::Select(query.clone()));
        let rows = self
            .tables
            .lock()
            .unwrap()
            .get(&query.table)
            .cloned()
            .unwrap_or(Ok(Vec::new()))?;

        let mut rows: Vec<Value> = rows
            .into_iter()
            .filter(|row| {
                query
                    .filters
                    .iter()
                    .filter(|f| f.op == FilterOp::Eq)
                    .all(|f| row.get(&f.column).map(plain).as_deref() == Some(f.value.as_str()))
            })
            .collect();
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError> {
        self.record(Call::SignIn(email.to_string()));
        let passwords = self.passwords.lock().unwrap();
        match passwords.get(email) {
            Some((expected, token)) if expected == password => {
                let user = self
                    .sessions
                    .lock()
                    .unwrap()
                    .get(token)
                    .cloned()
                    .ok_or_else(|| GatewayError::Unauthorized("unknown session".to_string()))?;
                Ok(AuthSession {
                    access_token: token.clone(),
                    refresh_token: None,
                    expires_in: Some(3600),
                    user,
                })
            }
            _ => Err(GatewayError::Backend {
                status: 400,
                message: "Invalid login credentials".to_string(),
            }),
        }
    }

    async fn sign_out(&self, token: &str) -> Result<(), GatewayError> {
        self.record(Call::SignOut(token.to_string()));
        Ok(())
    }

    async fn session_user(&self, token: &str) -> Result<AuthUser, GatewayError> {
        self.record(Call::SessionUser(token.to_string()));
        self.sessions
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| GatewayError::Unauthorized("invalid JWT".to_string()))
    }
}

pub fn supervisor() -> UserAccount {
    UserAccount {
        id: Uuid::parse_str("6f1c7b8e-2d4a-4a8e-9a51-1f0d2b3c4d5e").unwrap(),
        full_name: "Sofia Supervisora".to_string(),
        role: Role::Supervisor,
        email: Some("sofia@example.com".to_string()),
    }
}

pub fn operator() -> UserAccount {
    UserAccount {
        id: Uuid::parse_str("0a9b8c7d-6e5f-4a3b-8c1d-2e3f4a5b6c7d").unwrap(),
        full_name: "Oscar Operador".to_string(),
        role: Role::Operator,
        email: Some("oscar@example.com".to_string()),
    }
}

/// Gateway with one supervisor and one operator session registered.
pub fn fake_gateway() -> Arc<FakeGateway> {
    let gateway = Arc::new(FakeGateway::default());
    gateway.add_user(SUPERVISOR_TOKEN, &supervisor(), Some("supervisor-pass"));
    gateway.add_user(OPERATOR_TOKEN, &operator(), Some("operator-pass"));
    gateway
}

pub fn repository(gateway: &Arc<FakeGateway>) -> Repository {
    Repository::new(gateway.clone())
}

pub fn asset_row(id: i64, name: &str, operational: bool) -> Value {
    json!({
        "id": id,
        "nombre": name,
        "modelo": "H50",
        "tipo": "Horquilla",
        "codigo_qr": format!("QR-{}", id),
        "es_operativa": operational,
        "es_standby": false,
        "horometro_actual": 1200.5
    })
}

pub fn report_row(id: &str, asset_id: i64, asset_name: &str, shift: i32, has_problems: bool) -> Value {
    json!({
        "id": id,
        "activo_id": asset_id,
        "usuario_id": operator().id,
        "plantilla_id": 1,
        "timestamp_inicio": "2024-03-05T08:00:00+00:00",
        "timestamp_completado": "2024-03-05T08:15:00+00:00",
        "duracion_minutos": 15,
        "tiene_problemas": has_problems,
        "total_respuestas": 20,
        "respuestas_malas": if has_problems { 2 } else { 0 },
        "score_cumplimiento": if has_problems { 90.0 } else { 100.0 },
        "turno": shift,
        "horometro_inicial": 1200.0,
        "horometro_final": 1204.0,
        "horometro_pendiente": false,
        "horas_uso": 4.0,
        "activo": { "nombre": asset_name, "modelo": "H50" },
        "usuario": { "nombre_completo": operator().full_name }
    })
}
