//! Hour-meter projections.

use serde::{Deserialize, Serialize};

/// Days without a reading after which an hour meter is flagged.
pub const STALE_AFTER_DAYS: f64 = 7.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourMeterCorrelation {
    #[serde(alias = "activo_id")]
    pub asset_id: i64,
    #[serde(alias = "activo_nombre")]
    pub asset_name: String,
    #[serde(default, alias = "total_horas_uso")]
    pub total_hours_used: f64,
    #[serde(default, alias = "total_inspecciones")]
    pub inspections: i64,
    #[serde(default, alias = "inspecciones_con_problemas")]
    pub inspections_with_problems: i64,
    #[serde(default, alias = "porcentaje_problemas")]
    pub problem_percentage: f64,
    #[serde(default, alias = "promedio_horas_por_inspeccion")]
    pub average_hours_per_inspection: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourMeterEfficiency {
    #[serde(alias = "activo_id")]
    pub asset_id: i64,
    #[serde(alias = "activo_nombre")]
    pub asset_name: String,
    #[serde(default, alias = "dias_periodo")]
    pub period_days: i64,
    #[serde(default, alias = "horas_uso_total")]
    pub total_hours_used: f64,
    #[serde(default, alias = "horas_disponibles_teoricas")]
    pub theoretical_hours: f64,
    #[serde(default, alias = "porcentaje_utilizacion")]
    pub utilization_percentage: f64,
    #[serde(default, alias = "promedio_horas_dia")]
    pub average_hours_per_day: f64,
}

/// Utilization classification used to color efficiency bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilizationBand {
    High,
    Medium,
    Low,
}

impl HourMeterEfficiency {
    pub fn band(&self) -> UtilizationBand {
        if self.utilization_percentage > 50.0 {
            UtilizationBand::High
        } else if self.utilization_percentage > 25.0 {
            UtilizationBand::Medium
        } else {
            UtilizationBand::Low
        }
    }

    /// Width of the progress bar, capped at a full bar.
    pub fn bar_percentage(&self) -> f64 {
        self.utilization_percentage.clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourMeterStatus {
    #[serde(alias = "activo_id")]
    pub asset_id: i64,
    #[serde(alias = "activo_nombre")]
    pub asset_name: String,
    #[serde(default, alias = "horometro_actual")]
    pub current_reading: Option<f64>,
    #[serde(default, alias = "fecha_ultimo_reporte")]
    pub last_report_at: Option<String>,
    #[serde(default, alias = "dias_sin_actualizacion")]
    pub days_without_update: f64,
    #[serde(default, alias = "ultima_grua_operativa")]
    pub operational: bool,
}

impl HourMeterStatus {
    pub fn is_stale(&self) -> bool {
        self.days_without_update > STALE_AFTER_DAYS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn efficiency(pct: f64) -> HourMeterEfficiency {
        HourMeterEfficiency {
            asset_id: 1,
            asset_name: "Grua 01".to_string(),
            period_days: 90,
            total_hours_used: 0.0,
            theoretical_hours: 0.0,
            utilization_percentage: pct,
            average_hours_per_day: 0.0,
        }
    }

    #[test]
    fn test_utilization_bands() {
        assert_eq!(efficiency(50.1).band(), UtilizationBand::High);
        assert_eq!(efficiency(50.0).band(), UtilizationBand::Medium);
        assert_eq!(efficiency(25.0).band(), UtilizationBand::Low);
        assert_eq!(efficiency(130.0).bar_percentage(), 100.0);
    }

    #[test]
    fn test_stale_after_a_week() {
        let mut status = HourMeterStatus {
            asset_id: 1,
            asset_name: "Grua 01".to_string(),
            current_reading: Some(10.0),
            last_report_at: None,
            days_without_update: 7.0,
            operational: true,
        };
        assert!(!status.is_stale());
        status.days_without_update = 8.0;
        assert!(status.is_stale());
    }
}
