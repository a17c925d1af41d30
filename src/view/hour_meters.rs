//! Hour-meter page: readings, usage against problems, and utilization.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{HourMeterCorrelation, HourMeterEfficiency, HourMeterStatus, UtilizationBand};
use crate::repository::Repository;

use super::{Degraded, Page, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HourMeterFilters {
    pub days: u32,
}

impl Default for HourMeterFilters {
    fn default() -> Self {
        Self { days: 90 }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourMeterStatusRow {
    #[serde(flatten)]
    pub status: HourMeterStatus,
    pub stale: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyRow {
    #[serde(flatten)]
    pub efficiency: HourMeterEfficiency,
    pub band: UtilizationBand,
    pub bar_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourMetersView {
    pub days: u32,
    pub status: Vec<HourMeterStatusRow>,
    pub stale_count: usize,
    pub correlation: Vec<HourMeterCorrelation>,
    pub efficiency: Vec<EfficiencyRow>,
    pub unavailable: Vec<&'static str>,
}

pub struct HourMetersPage;

#[async_trait]
impl Page for HourMetersPage {
    type Filters = HourMeterFilters;
    type Data = HourMetersView;

    const NAME: &'static str = "hour-meters";

    async fn load(&self, repo: &Repository, session: &Session, filters: &HourMeterFilters) -> HourMetersView {
        let token = session.token.as_str();
        let (correlation, efficiency, status) = tokio::join!(
            repo.hour_meter_correlation(token, filters.days),
            repo.hour_meter_efficiency(token, filters.days),
            repo.hour_meter_status(token),
        );

        let mut degraded = Degraded::default();
        let status: Vec<HourMeterStatusRow> = degraded
            .take("status", status)
            .into_iter()
            .map(|status| HourMeterStatusRow {
                stale: status.is_stale(),
                status,
            })
            .collect();
        let efficiency = degraded
            .take("efficiency", efficiency)
            .into_iter()
            .map(|efficiency| EfficiencyRow {
                band: efficiency.band(),
                bar_percentage: efficiency.bar_percentage(),
                efficiency,
            })
            .collect();

        HourMetersView {
            days: filters.days,
            stale_count: status.iter().filter(|row| row.stale).count(),
            status,
            correlation: degraded.take("correlation", correlation),
            efficiency,
            unavailable: degraded.into_sections(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use crate::view::PageController;
    use serde_json::json;

    #[tokio::test]
    async fn test_hour_meter_page_flags() {
        let gateway = fake_gateway();
        gateway.set_rpc(
            "obtener_estado_horometros",
            json!([
                { "activo_id": 1, "activo_nombre": "Grua 01", "dias_sin_actualizacion": 12.0 },
                { "activo_id": 2, "activo_nombre": "Grua 02", "dias_sin_actualizacion": 1.0 }
            ]),
        );
        gateway.set_rpc(
            "obtener_eficiencia_horometro",
            json!([{ "activo_id": 1, "activo_nombre": "Grua 01", "porcentaje_utilizacion": 140.0 }]),
        );
        let mut page = PageController::new(HourMetersPage, repository(&gateway), "/login");

        page.mount(Some(SUPERVISOR_TOKEN), &HourMeterFilters::default())
            .await
            .unwrap();

        assert_eq!(
            gateway.rpc_calls("obtener_correlacion_horometro_problemas"),
            vec![json!({ "dias": 90 })]
        );
        let view = page.into_data().unwrap();
        assert_eq!(view.stale_count, 1);
        assert!(view.status[0].stale);
        assert_eq!(view.efficiency[0].band, UtilizationBand::High);
        assert_eq!(view.efficiency[0].bar_percentage, 100.0);
    }
}
