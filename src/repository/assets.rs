//! Asset (crane) accessors.

use serde_json::Value;

use crate::errors::AppError;
use crate::gateway::{GatewayError, TableQuery};
use crate::models::{Asset, AssetProblem, StatusChange, StatusHistoryEntry};

use super::Repository;

impl Repository {
    /// All assets ordered by name.
    pub async fn list_assets(&self, token: &str) -> Result<Vec<Asset>, AppError> {
        let query = TableQuery::table("activos").order("nombre", true);
        self.read(token, &query).await
    }

    /// Flip an asset's operability and append a history record, in one remote call.
    ///
    /// The backend's error message is returned unmodified.
    pub async fn change_asset_status(
        &self,
        token: &str,
        change: &StatusChange,
    ) -> Result<Value, AppError> {
        tracing::info!(
            asset_id = change.asset_id,
            operational = change.operational,
            actor = %change.actor_id,
            "Changing asset status"
        );

        self.gateway
            .rpc(token, "cambiar_estado_activo", change.rpc_params())
            .await
            .map_err(|e| {
                let message = match e {
                    GatewayError::Backend { message, .. }
                    | GatewayError::Unauthorized(message)
                    | GatewayError::Transport(message)
                    | GatewayError::Decode(message) => message,
                };
                tracing::error!(asset_id = change.asset_id, %message, "Status change failed");
                AppError::StatusChange(message)
            })
    }

    /// Status changes of one asset, newest first.
    pub async fn status_history(
        &self,
        token: &str,
        asset_id: i64,
    ) -> Result<Vec<StatusHistoryEntry>, AppError> {
        let query = TableQuery::table("historial_estados_activo")
            .select("*, usuarios:usuario_cambio(nombre_completo)")
            .eq("activo_id", asset_id)
            .order("fecha_cambio", false);
        self.read(token, &query).await
    }

    /// Recurring failures seen on one asset.
    pub async fn problems_by_asset(
        &self,
        token: &str,
        asset_id: i64,
        days: u32,
    ) -> Result<Vec<AssetProblem>, AppError> {
        self.call_rows(
            token,
            "obtener_problemas_por_activo",
            serde_json::json!({ "activo_id_param": asset_id, "dias_periodo": days }),
        )
        .await
    }
}
