//! Domain accessors over the remote data gateway.
//!
//! One file per business area. Every accessor returns a `Result`: whether a
//! failed read becomes an empty section is the caller's decision, not ours.

mod assets;
mod critical_problems;
mod dashboard;
mod hour_meters;
mod operators;
mod reports;
mod session;

pub use reports::ReportQuery;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::AppError;
use crate::gateway::{DataGateway, TableQuery};

/// Typed access to the hosted backend on behalf of a session.
#[derive(Clone)]
pub struct Repository {
    gateway: Arc<dyn DataGateway>,
}

impl Repository {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self { gateway }
    }

    /// Call a procedure that returns a set of rows.
    async fn call_rows<T: DeserializeOwned>(
        &self,
        token: &str,
        function: &str,
        params: Value,
    ) -> Result<Vec<T>, AppError> {
        let value = self.gateway.rpc(token, function, params).await?;
        decode_rows(value)
    }

    /// Call a procedure that returns a single record.
    async fn call_one<T: DeserializeOwned>(
        &self,
        token: &str,
        function: &str,
        params: Value,
    ) -> Result<Option<T>, AppError> {
        let value = self.gateway.rpc(token, function, params).await?;
        decode_one(value)
    }

    async fn read<T: DeserializeOwned>(
        &self,
        token: &str,
        query: &TableQuery,
    ) -> Result<Vec<T>, AppError> {
        let rows = self.gateway.select(token, query).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(AppError::from))
            .collect()
    }
}

fn decode_rows<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, AppError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        other => Ok(vec![serde_json::from_value(other)?]),
    }
}

fn decode_one<T: DeserializeOwned>(value: Value) -> Result<Option<T>, AppError> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => match items.into_iter().next() {
            Some(first) => Ok(Some(serde_json::from_value(first)?)),
            None => Ok(None),
        },
        other => Ok(Some(serde_json::from_value(other)?)),
    }
}
