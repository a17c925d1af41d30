//! Crane assets and their operational-status history.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::PersonRef;

/// A crane unit (`activos` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: i64,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "modelo")]
    pub model: String,
    #[serde(default, alias = "tipo")]
    pub kind: String,
    #[serde(default, alias = "codigo_qr", skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(alias = "es_operativa")]
    pub operational: bool,
    #[serde(default, alias = "es_standby")]
    pub standby: bool,
    #[serde(default, alias = "horometro_actual")]
    pub hour_meter: Option<f64>,
}

/// Asset fields embedded in report rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRef {
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "modelo", skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, alias = "tipo", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// One entry of `historial_estados_activo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    pub id: i64,
    #[serde(alias = "activo_id")]
    pub asset_id: i64,
    #[serde(default, alias = "es_operativa")]
    pub operational: Option<bool>,
    #[serde(default, alias = "motivo")]
    pub reason: Option<String>,
    #[serde(alias = "fecha_cambio")]
    pub changed_at: String,
    #[serde(default, alias = "usuario_cambio")]
    pub changed_by: Option<Uuid>,
    #[serde(default, alias = "usuarios")]
    pub changed_by_user: Option<PersonRef>,
}

/// Request to flip an asset's operability, recorded against the acting supervisor.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub asset_id: i64,
    pub operational: bool,
    pub actor_id: Uuid,
    pub reason: Option<String>,
}

impl StatusChange {
    /// Parameters for the `cambiar_estado_activo` procedure.
    pub fn rpc_params(&self) -> Value {
        json!({
            "p_activo_id": self.asset_id,
            "p_es_operativa": self.operational,
            "p_usuario_id": self.actor_id,
            "p_motivo": self.reason,
        })
    }
}

/// Operational/inactive headcount shown above the fleet list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetCounts {
    pub operational: usize,
    pub inactive: usize,
    pub standby: usize,
}

impl FleetCounts {
    pub fn of(assets: &[Asset]) -> Self {
        assets.iter().fold(Self::default(), |mut counts, asset| {
            if asset.operational {
                counts.operational += 1;
            } else {
                counts.inactive += 1;
            }
            if asset.standby {
                counts.standby += 1;
            }
            counts
        })
    }
}
