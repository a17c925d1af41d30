//! Operator and cost-center accessors.

use serde_json::json;

use crate::errors::AppError;
use crate::models::{CostCenterAnalysis, OperatorAnalysis};

use super::Repository;

impl Repository {
    pub async fn operator_analysis(
        &self,
        token: &str,
        days: u32,
    ) -> Result<Vec<OperatorAnalysis>, AppError> {
        self.call_rows(token, "obtener_analisis_operadores", json!({ "dias": days }))
            .await
    }

    pub async fn cost_center_analysis(
        &self,
        token: &str,
        days: u32,
    ) -> Result<Vec<CostCenterAnalysis>, AppError> {
        self.call_rows(token, "obtener_analisis_centro_costo", json!({ "dias": days }))
            .await
    }
}
