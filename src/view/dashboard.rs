//! Dashboard home: KPIs, trend, shifts, top problems and recent activity.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{
    DailyTrendPoint, KpiSnapshot, ProblematicAsset, RecentReport, ShiftStats, TopProblem,
};
use crate::repository::Repository;

use super::{Degraded, Page, Session};

const RECENT_REPORTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardFilters {
    pub days: u32,
    pub top_assets: u32,
}

impl Default for DashboardFilters {
    fn default() -> Self {
        Self {
            days: 30,
            top_assets: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRow {
    pub shift: u8,
    pub stats: Option<ShiftStats>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub kpis: KpiSnapshot,
    pub trend: Vec<DailyTrendPoint>,
    pub shifts: Vec<ShiftRow>,
    pub top_assets: Vec<ProblematicAsset>,
    pub top_problems: Vec<TopProblem>,
    pub recent_reports: Vec<RecentReport>,
    pub unavailable: Vec<&'static str>,
}

pub struct DashboardPage;

#[async_trait]
impl Page for DashboardPage {
    type Filters = DashboardFilters;
    type Data = DashboardView;

    const NAME: &'static str = "dashboard";

    async fn load(&self, repo: &Repository, session: &Session, filters: &DashboardFilters) -> DashboardView {
        let token = session.token.as_str();
        let days = filters.days;

        let (kpis, trend, shifts, top_assets, top_problems, recent_reports) = tokio::join!(
            repo.kpis(token),
            repo.daily_trend(token, days),
            repo.shift_analysis(token, days),
            repo.top_problematic_assets(token, filters.top_assets, days),
            repo.top_problems(token, days),
            repo.recent_reports(token, RECENT_REPORTS),
        );

        let mut degraded = Degraded::default();
        let shifts = degraded.take("shifts", shifts).unwrap_or_default();

        DashboardView {
            kpis: degraded.take("kpis", kpis).unwrap_or_default(),
            trend: degraded.take("trend", trend),
            shifts: (1..=3)
                .map(|n| ShiftRow {
                    shift: n,
                    stats: shifts.shift(n).cloned(),
                })
                .collect(),
            top_assets: degraded.take("topAssets", top_assets),
            top_problems: degraded.take("topProblems", top_problems),
            recent_reports: degraded.take("recentReports", recent_reports),
            unavailable: degraded.into_sections(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use crate::testing::*;
    use crate::view::PageController;
    use serde_json::json;

    #[tokio::test]
    async fn test_sections_fetched_with_period() {
        let gateway = fake_gateway();
        gateway.set_rpc(
            "obtener_analisis_turnos",
            json!({ "turno_2": { "total_inspecciones": 4, "score_promedio": 91.5 } }),
        );
        let mut page = PageController::new(DashboardPage, repository(&gateway), "/login");

        page.mount(Some(SUPERVISOR_TOKEN), &DashboardFilters::default())
            .await
            .unwrap();

        assert_eq!(gateway.rpc_calls("obtener_tendencia_diaria"), vec![json!({ "dias": 30 })]);
        assert_eq!(
            gateway.rpc_calls("obtener_top_gruas_problematicas"),
            vec![json!({ "limite": 5, "dias": 30 })]
        );
        assert_eq!(gateway.selects("reportes_inspeccion")[0].limit, Some(10));

        let view = page.into_data().unwrap();
        assert_eq!(view.shifts.len(), 3);
        assert!(view.shifts[0].stats.is_none());
        assert_eq!(view.shifts[1].stats.as_ref().map(|s| s.inspections), Some(4));
    }

    #[tokio::test]
    async fn test_failed_section_is_empty_and_reported() {
        let gateway = fake_gateway();
        gateway.fail_rpc(
            "obtener_kpis_dashboard",
            GatewayError::Transport("connection reset".to_string()),
        );
        gateway.set_rpc(
            "obtener_top_problemas_dinamico",
            json!([{ "texto_pregunta": "Frenos", "total_fallos": 3, "porcentaje_fallo": 12.0 }]),
        );
        let mut page = PageController::new(DashboardPage, repository(&gateway), "/login");

        page.mount(Some(SUPERVISOR_TOKEN), &DashboardFilters::default())
            .await
            .unwrap();

        let view = page.into_data().unwrap();
        assert_eq!(view.kpis, KpiSnapshot::default());
        assert_eq!(view.top_problems.len(), 1);
        assert_eq!(view.unavailable, vec!["kpis"]);
    }
}
