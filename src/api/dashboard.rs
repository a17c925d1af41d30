//! Dashboard home endpoint.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Extension;

use super::{query_params, render, ApiResult, PeriodQuery};
use crate::auth::SessionToken;
use crate::view::{DashboardFilters, DashboardPage, DashboardView};
use crate::AppState;

/// GET /api/dashboard - KPIs, trend, shifts, top assets and problems, recent reports.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    params: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<DashboardView> {
    render(&state, DashboardPage, &token, move || {
        let defaults = DashboardFilters::default();
        Ok(DashboardFilters {
            days: query_params(params)?.days_or(defaults.days)?,
            ..defaults
        })
    })
    .await
}
