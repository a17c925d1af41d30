//! Fleet-wide aggregates for the dashboard home and heatmap.

use serde_json::json;

use crate::errors::AppError;
use crate::gateway::TableQuery;
use crate::models::{
    DailyTrendPoint, HeatmapCell, KpiSnapshot, ProblematicAsset, RecentReport, ShiftAnalysis,
    TopProblem,
};

use super::Repository;

impl Repository {
    pub async fn kpis(&self, token: &str) -> Result<Option<KpiSnapshot>, AppError> {
        self.call_one(token, "obtener_kpis_dashboard", json!({})).await
    }

    pub async fn daily_trend(
        &self,
        token: &str,
        days: u32,
    ) -> Result<Vec<DailyTrendPoint>, AppError> {
        self.call_rows(token, "obtener_tendencia_diaria", json!({ "dias": days }))
            .await
    }

    pub async fn shift_analysis(
        &self,
        token: &str,
        days: u32,
    ) -> Result<Option<ShiftAnalysis>, AppError> {
        self.call_one(token, "obtener_analisis_turnos", json!({ "dias": days }))
            .await
    }

    /// Assets with the highest share of reports with problems.
    pub async fn top_problematic_assets(
        &self,
        token: &str,
        limit: u32,
        days: u32,
    ) -> Result<Vec<ProblematicAsset>, AppError> {
        self.call_rows(
            token,
            "obtener_top_gruas_problematicas",
            json!({ "limite": limit, "dias": days }),
        )
        .await
    }

    pub async fn heatmap(&self, token: &str, days: u32) -> Result<Vec<HeatmapCell>, AppError> {
        self.call_rows(token, "obtener_heatmap_gruas", json!({ "dias": days }))
            .await
    }

    pub async fn top_problems(&self, token: &str, days: u32) -> Result<Vec<TopProblem>, AppError> {
        self.call_rows(token, "obtener_top_problemas_dinamico", json!({ "dias": days }))
            .await
    }

    pub async fn recent_reports(
        &self,
        token: &str,
        limit: usize,
    ) -> Result<Vec<RecentReport>, AppError> {
        let query = TableQuery::table("reportes_inspeccion")
            .select(
                r#"
                id,
                timestamp_completado,
                tiene_problemas,
                score_cumplimiento,
                activo:activos!inner(nombre),
                usuario:usuarios!inner(nombre_completo)
                "#,
            )
            .order("timestamp_completado", false)
            .limit(limit);
        self.read(token, &query).await
    }
}
