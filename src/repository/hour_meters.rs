//! Hour-meter accessors.

use serde_json::json;

use crate::errors::AppError;
use crate::models::{HourMeterCorrelation, HourMeterEfficiency, HourMeterStatus};

use super::Repository;

impl Repository {
    /// Usage hours against problem rate per asset.
    pub async fn hour_meter_correlation(
        &self,
        token: &str,
        days: u32,
    ) -> Result<Vec<HourMeterCorrelation>, AppError> {
        self.call_rows(
            token,
            "obtener_correlacion_horometro_problemas",
            json!({ "dias": days }),
        )
        .await
    }

    /// Utilization against theoretical available hours per asset.
    pub async fn hour_meter_efficiency(
        &self,
        token: &str,
        days: u32,
    ) -> Result<Vec<HourMeterEfficiency>, AppError> {
        self.call_rows(token, "obtener_eficiencia_horometro", json!({ "dias": days }))
            .await
    }

    pub async fn hour_meter_status(&self, token: &str) -> Result<Vec<HourMeterStatus>, AppError> {
        self.call_rows(token, "obtener_estado_horometros", json!({}))
            .await
    }
}
