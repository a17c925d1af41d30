//! Aggregates computed by the dashboard procedures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Snapshot returned by `obtener_kpis_dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSnapshot {
    #[serde(default, alias = "total_reportes_hoy")]
    pub reports_today: i64,
    #[serde(default, alias = "total_reportes_semana")]
    pub reports_this_week: i64,
    #[serde(default, alias = "total_reportes_mes")]
    pub reports_this_month: i64,
    #[serde(default, alias = "score_promedio_global")]
    pub average_score: f64,
    #[serde(default, alias = "reportes_con_problemas")]
    pub reports_with_problems: i64,
    #[serde(default, alias = "porcentaje_con_problemas")]
    pub problem_percentage: f64,
    #[serde(default, alias = "activos_inspeccionados")]
    pub assets_inspected: i64,
    #[serde(default, alias = "total_activos")]
    pub total_assets: i64,
    #[serde(default, alias = "horometros_pendientes")]
    pub pending_hour_meters: i64,
    #[serde(default, alias = "horas_uso_total_mes")]
    pub hours_used_this_month: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrendPoint {
    #[serde(alias = "fecha")]
    pub date: NaiveDate,
    #[serde(default, alias = "score_promedio")]
    pub average_score: f64,
    #[serde(default, alias = "total_inspecciones")]
    pub inspections: i64,
    #[serde(default, alias = "con_problemas")]
    pub with_problems: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftStats {
    #[serde(default, alias = "total_inspecciones")]
    pub inspections: i64,
    #[serde(default, alias = "score_promedio")]
    pub average_score: f64,
    #[serde(default, alias = "con_problemas")]
    pub with_problems: i64,
    #[serde(default, alias = "horas_uso")]
    pub hours_used: f64,
}

/// Per-shift breakdown; the backend keys the three buckets `turno_1..turno_3`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftAnalysis {
    #[serde(default, alias = "turno_1")]
    pub shift_1: Option<ShiftStats>,
    #[serde(default, alias = "turno_2")]
    pub shift_2: Option<ShiftStats>,
    #[serde(default, alias = "turno_3")]
    pub shift_3: Option<ShiftStats>,
}

impl ShiftAnalysis {
    pub fn shift(&self, number: u8) -> Option<&ShiftStats> {
        match number {
            1 => self.shift_1.as_ref(),
            2 => self.shift_2.as_ref(),
            3 => self.shift_3.as_ref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblematicAsset {
    #[serde(default, alias = "activo_id")]
    pub asset_id: Option<i64>,
    #[serde(alias = "activo_nombre")]
    pub asset_name: String,
    #[serde(default, alias = "total_reportes")]
    pub total_reports: i64,
    #[serde(default, alias = "reportes_con_problemas")]
    pub reports_with_problems: i64,
    #[serde(default, alias = "porcentaje_problemas")]
    pub problem_percentage: f64,
}

/// A recurring checklist failure on the dashboard home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProblem {
    #[serde(default, alias = "pregunta_id")]
    pub question_id: Option<i64>,
    #[serde(alias = "texto_pregunta")]
    pub question_text: String,
    #[serde(default, alias = "total_fallos", alias = "total_fallo")]
    pub failures: i64,
    #[serde(default, alias = "porcentaje_fallo")]
    pub failure_percentage: f64,
}

/// One (asset, day) aggregate of the fleet heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    #[serde(alias = "activo_id")]
    pub asset_id: i64,
    #[serde(alias = "activo_nombre")]
    pub asset_name: String,
    #[serde(alias = "fecha")]
    pub date: NaiveDate,
    #[serde(alias = "score_promedio")]
    pub average_score: f64,
    #[serde(default, alias = "total_inspecciones")]
    pub inspections: i64,
    #[serde(default, alias = "tiene_problemas")]
    pub has_problems: bool,
}
