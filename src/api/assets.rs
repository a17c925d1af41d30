//! Fleet endpoints, including the status change.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use super::{json_body, path_param, query_params, render, success, ApiResult, PeriodQuery};
use crate::auth::SessionToken;
use crate::errors::AppError;
use crate::view::{
    AssetDetailFilters, AssetDetailPage, AssetDetailView, FleetPage, FleetView,
    StatusChangeRequest, StatusDialog,
};
use crate::AppState;

/// GET /api/assets - All assets with operational counts.
pub async fn list_assets(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
) -> ApiResult<FleetView> {
    render(&state, FleetPage, &token, || Ok(())).await
}

/// GET /api/assets/:id - Status history and recurring problems of one asset.
pub async fn get_asset(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    asset_id: Result<Path<i64>, PathRejection>,
    params: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<AssetDetailView> {
    render(&state, AssetDetailPage, &token, move || {
        Ok(AssetDetailFilters {
            asset_id: path_param(asset_id)?,
            days: query_params(params)?.days_or(30)?,
        })
    })
    .await
}

/// POST /api/assets/:id/status - Flip an asset between operational and inactive.
///
/// Answers with the re-fetched fleet.
pub async fn change_asset_status(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    asset_id: Result<Path<i64>, PathRejection>,
    request: Result<Json<StatusChangeRequest>, JsonRejection>,
) -> ApiResult<FleetView> {
    let mut fleet = state.page(FleetPage);
    fleet.authorize(token.as_deref()).await?;
    let asset_id = path_param(asset_id)?;
    let request = json_body(request)?;
    fleet.reload(&()).await?;

    let asset = {
        let view = fleet
            .data()
            .ok_or_else(|| AppError::Internal("Fleet page produced no data".to_string()))?;
        if !view.unavailable.is_empty() {
            return Err(AppError::Backend("Asset list is unavailable".to_string()).into());
        }
        view.asset(asset_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Asset {} not found", asset_id)))?
    };

    let mut dialog = StatusDialog::default();
    dialog.open(asset);
    if let Some(reason) = request.reason {
        dialog.set_reason(reason);
    }
    dialog.confirm(&mut fleet).await?;

    let view = fleet
        .into_data()
        .ok_or_else(|| AppError::Internal("Fleet page produced no data".to_string()))?;
    success(view)
}
