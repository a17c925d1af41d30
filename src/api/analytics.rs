//! Heatmap, hour-meter and operator endpoints.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Extension;
use serde::Deserialize;

use super::{period, query_params, render, ApiResult, PeriodQuery};
use crate::auth::SessionToken;
use crate::errors::AppError;
use crate::models::OperatorSort;
use crate::view::{
    HeatmapFilters, HeatmapPage, HeatmapPageView, HourMeterFilters, HourMetersPage,
    HourMetersView, OperatorFilters, OperatorsPage, OperatorsView,
};
use crate::AppState;

/// GET /api/heatmap - Asset × day score grid.
pub async fn get_heatmap(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    params: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<HeatmapPageView> {
    render(&state, HeatmapPage, &token, move || {
        Ok(HeatmapFilters {
            days: query_params(params)?.days_or(HeatmapFilters::default().days)?,
        })
    })
    .await
}

/// GET /api/hour-meters - Readings, usage correlation and utilization.
pub async fn get_hour_meters(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    params: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<HourMetersView> {
    render(&state, HourMetersPage, &token, move || {
        Ok(HourMeterFilters {
            days: query_params(params)?.days_or(HourMeterFilters::default().days)?,
        })
    })
    .await
}

#[derive(Debug, Default, Deserialize)]
pub struct OperatorsQuery {
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub sort: Option<String>,
}

/// GET /api/operators - Operator ranking and cost-center comparison.
pub async fn get_operators(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    params: Result<Query<OperatorsQuery>, QueryRejection>,
) -> ApiResult<OperatorsView> {
    render(&state, OperatorsPage, &token, move || {
        let params = query_params(params)?;
        let defaults = OperatorFilters::default();
        let sort = match params.sort.as_deref().map(str::trim) {
            None | Some("") => defaults.sort,
            Some(key) => key
                .to_lowercase()
                .parse::<OperatorSort>()
                .map_err(AppError::Validation)?,
        };
        Ok(OperatorFilters {
            days: period(params.days, defaults.days)?,
            sort,
        })
    })
    .await
}
