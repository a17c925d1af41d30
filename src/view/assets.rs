//! Fleet page, per-asset detail and the status-change dialog.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Asset, AssetProblem, FleetCounts, StatusChange, StatusHistoryEntry};
use crate::repository::Repository;

use super::{Degraded, Page, PageController, Session};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetView {
    pub assets: Vec<Asset>,
    pub counts: FleetCounts,
    pub unavailable: Vec<&'static str>,
}

impl FleetView {
    pub fn asset(&self, asset_id: i64) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == asset_id)
    }
}

pub struct FleetPage;

#[async_trait]
impl Page for FleetPage {
    type Filters = ();
    type Data = FleetView;

    const NAME: &'static str = "fleet";

    async fn load(&self, repo: &Repository, session: &Session, _filters: &()) -> FleetView {
        let mut degraded = Degraded::default();
        let assets = degraded.take("assets", repo.list_assets(&session.token).await);

        FleetView {
            counts: FleetCounts::of(&assets),
            assets,
            unavailable: degraded.into_sections(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetDetailFilters {
    pub asset_id: i64,
    pub days: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetailView {
    pub asset_id: i64,
    pub days: u32,
    pub history: Vec<StatusHistoryEntry>,
    pub problems: Vec<AssetProblem>,
    pub unavailable: Vec<&'static str>,
}

pub struct AssetDetailPage;

#[async_trait]
impl Page for AssetDetailPage {
    type Filters = AssetDetailFilters;
    type Data = AssetDetailView;

    const NAME: &'static str = "asset-detail";

    async fn load(
        &self,
        repo: &Repository,
        session: &Session,
        filters: &AssetDetailFilters,
    ) -> AssetDetailView {
        let token = session.token.as_str();
        let (history, problems) = tokio::join!(
            repo.status_history(token, filters.asset_id),
            repo.problems_by_asset(token, filters.asset_id, filters.days),
        );

        let mut degraded = Degraded::default();
        AssetDetailView {
            asset_id: filters.asset_id,
            days: filters.days,
            history: degraded.take("history", history),
            problems: degraded.take("problems", problems),
            unavailable: degraded.into_sections(),
        }
    }
}

/// Body of a status-change request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusChangeRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Confirmation dialog for flipping an asset between operational and inactive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDialog {
    selected: Option<Asset>,
    reason: String,
    open: bool,
    error: Option<String>,
}

impl StatusDialog {
    pub fn open(&mut self, asset: Asset) {
        *self = Self {
            selected: Some(asset),
            open: true,
            ..Self::default()
        };
    }

    pub fn set_reason(&mut self, reason: impl Into<String>) {
        self.reason = reason.into();
    }

    /// Close without changing anything.
    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected(&self) -> Option<&Asset> {
        self.selected.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Send the flipped status for the selected asset.
    ///
    /// On success the fleet is reloaded and the dialog closes. On failure it
    /// stays open with the backend's message, and confirming again retries.
    /// Nothing guards against the same change being submitted twice.
    pub async fn confirm(&mut self, fleet: &mut PageController<FleetPage>) -> Result<(), AppError> {
        let (token, change) = {
            let asset = self
                .selected
                .as_ref()
                .ok_or_else(|| AppError::BadRequest("No asset selected".to_string()))?;
            let session = fleet
                .session()
                .ok_or_else(|| AppError::Unauthorized("Not signed in".to_string()))?;
            let reason = self.reason.trim();

            let change = StatusChange {
                asset_id: asset.id,
                operational: !asset.operational,
                actor_id: session.user.id,
                reason: (!reason.is_empty()).then(|| reason.to_string()),
            };
            (session.token.clone(), change)
        };

        self.error = None;
        match fleet.repo().change_asset_status(&token, &change).await {
            Ok(_) => {
                *self = Self::default();
                fleet.reload(&()).await
            }
            Err(e) => {
                self.error = Some(e.message());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use crate::testing::*;
    use serde_json::json;
    use std::sync::Arc;

    async fn mounted_fleet(gateway: &Arc<FakeGateway>) -> PageController<FleetPage> {
        let mut fleet = PageController::new(FleetPage, repository(gateway), "/login");
        fleet.mount(Some(SUPERVISOR_TOKEN), &()).await.unwrap();
        fleet
    }

    #[tokio::test]
    async fn test_fleet_counts() {
        let gateway = fake_gateway();
        gateway.set_table(
            "activos",
            vec![asset_row(1, "Grua 01", true), asset_row(2, "Grua 02", false)],
        );

        let fleet = mounted_fleet(&gateway).await;
        let view = fleet.data().unwrap();
        assert_eq!(view.counts.operational, 1);
        assert_eq!(view.counts.inactive, 1);
        assert_eq!(view.asset(2).map(|a| a.name.as_str()), Some("Grua 02"));
    }

    #[tokio::test]
    async fn test_confirm_sends_negated_flag_and_reloads() {
        let gateway = fake_gateway();
        gateway.set_table("activos", vec![asset_row(7, "Grua 07", true)]);
        gateway.set_rpc("cambiar_estado_activo", json!({ "success": true }));
        let mut fleet = mounted_fleet(&gateway).await;

        let mut dialog = StatusDialog::default();
        dialog.open(fleet.data().unwrap().assets[0].clone());
        dialog.set_reason("  Falla hidráulica ");
        dialog.confirm(&mut fleet).await.unwrap();

        assert_eq!(
            gateway.rpc_calls("cambiar_estado_activo"),
            vec![json!({
                "p_activo_id": 7,
                "p_es_operativa": false,
                "p_usuario_id": supervisor().id,
                "p_motivo": "Falla hidráulica",
            })]
        );
        assert_eq!(gateway.selects("activos").len(), 2);
        assert!(!dialog.is_open());
        assert!(dialog.selected().is_none());
    }

    #[tokio::test]
    async fn test_empty_reason_is_sent_as_null() {
        let gateway = fake_gateway();
        gateway.set_table("activos", vec![asset_row(3, "Grua 03", false)]);
        let mut fleet = mounted_fleet(&gateway).await;

        let mut dialog = StatusDialog::default();
        dialog.open(fleet.data().unwrap().assets[0].clone());
        dialog.confirm(&mut fleet).await.unwrap();

        let params = &gateway.rpc_calls("cambiar_estado_activo")[0];
        assert_eq!(params["p_es_operativa"], true);
        assert!(params["p_motivo"].is_null());
    }

    #[tokio::test]
    async fn test_failure_keeps_dialog_open_with_message() {
        let gateway = fake_gateway();
        gateway.set_table("activos", vec![asset_row(7, "Grua 07", true)]);
        gateway.fail_rpc(
            "cambiar_estado_activo",
            GatewayError::Backend {
                status: 403,
                message: "permission denied for function cambiar_estado_activo".to_string(),
            },
        );
        let mut fleet = mounted_fleet(&gateway).await;

        let mut dialog = StatusDialog::default();
        dialog.open(fleet.data().unwrap().assets[0].clone());
        dialog.set_reason("Mantención");
        let err = dialog.confirm(&mut fleet).await.unwrap_err();

        assert_eq!(
            err,
            AppError::StatusChange("permission denied for function cambiar_estado_activo".to_string())
        );
        assert!(dialog.is_open());
        assert_eq!(
            dialog.error(),
            Some("permission denied for function cambiar_estado_activo")
        );
        assert_eq!(dialog.selected().map(|a| a.id), Some(7));
        assert_eq!(gateway.selects("activos").len(), 1);
    }

    #[tokio::test]
    async fn test_failed_change_can_be_resubmitted() {
        let gateway = fake_gateway();
        gateway.set_table("activos", vec![asset_row(7, "Grua 07", true)]);
        gateway.fail_rpc(
            "cambiar_estado_activo",
            GatewayError::Backend {
                status: 500,
                message: "timeout".to_string(),
            },
        );
        let mut fleet = mounted_fleet(&gateway).await;

        let mut dialog = StatusDialog::default();
        dialog.open(fleet.data().unwrap().assets[0].clone());
        dialog.set_reason("Mantención");
        assert!(dialog.confirm(&mut fleet).await.is_err());
        assert!(dialog.confirm(&mut fleet).await.is_err());

        let calls = gateway.rpc_calls("cambiar_estado_activo");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
        assert_eq!(calls[1]["p_motivo"], "Mantención");
        assert!(dialog.is_open());
        assert_eq!(dialog.error(), Some("timeout"));

        dialog.cancel();
        assert_eq!(dialog, StatusDialog::default());
    }

    #[tokio::test]
    async fn test_cancel_clears_selection() {
        let gateway = fake_gateway();
        gateway.set_table("activos", vec![asset_row(7, "Grua 07", true)]);
        let mut fleet = mounted_fleet(&gateway).await;

        let mut dialog = StatusDialog::default();
        dialog.open(fleet.data().unwrap().assets[0].clone());
        dialog.set_reason("x");
        dialog.cancel();

        assert_eq!(dialog, StatusDialog::default());
        assert!(dialog.confirm(&mut fleet).await.is_err());
        assert!(gateway.rpc_calls("cambiar_estado_activo").is_empty());
    }

    #[tokio::test]
    async fn test_asset_detail_loads_history_and_problems() {
        let gateway = fake_gateway();
        gateway.set_table(
            "historial_estados_activo",
            vec![json!({
                "id": 1,
                "activo_id": 4,
                "es_operativa": false,
                "motivo": "Cadena cortada",
                "fecha_cambio": "2024-03-05T10:00:00+00:00",
                "usuario_cambio": supervisor().id,
                "usuarios": { "nombre_completo": "Sofia Supervisora" }
            })],
        );
        let mut page = PageController::new(AssetDetailPage, repository(&gateway), "/login");

        page.mount(
            Some(SUPERVISOR_TOKEN),
            &AssetDetailFilters { asset_id: 4, days: 30 },
        )
        .await
        .unwrap();

        let view = page.into_data().unwrap();
        assert_eq!(view.history.len(), 1);
        assert_eq!(view.history[0].reason.as_deref(), Some("Cadena cortada"));
        assert_eq!(
            gateway.rpc_calls("obtener_problemas_por_activo"),
            vec![json!({ "activo_id_param": 4, "dias_periodo": 30 })]
        );
    }
}
