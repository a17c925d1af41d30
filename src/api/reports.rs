//! Report list and detail endpoints.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Extension;

use super::{path_param, query_params, render, success, ApiResult};
use crate::auth::SessionToken;
use crate::errors::AppError;
use crate::view::{ReportDetailPage, ReportDetailView, ReportFilters, ReportsPage, ReportsView};
use crate::AppState;

/// GET /api/reports - Reports filtered by asset, date range, problems, operator, shift and text.
pub async fn list_reports(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    filters: Result<Query<ReportFilters>, QueryRejection>,
) -> ApiResult<ReportsView> {
    render(&state, ReportsPage, &token, move || {
        let filters = query_params(filters)?;
        if let (Some(from), Some(to)) = (filters.from, filters.to) {
            if to <= from {
                return Err(AppError::Validation(format!(
                    "Empty date range: {} to {}",
                    from, to
                )));
            }
        }
        Ok(filters)
    })
    .await
}

/// GET /api/reports/:id - One report with answers grouped by category.
pub async fn get_report(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    report_id: Result<Path<String>, PathRejection>,
) -> ApiResult<ReportDetailView> {
    let view = render(&state, ReportDetailPage, &token, move || path_param(report_id))
        .await?
        .data;
    if view.report.is_none() && view.unavailable.is_empty() {
        return Err(AppError::NotFound(format!("Report {} not found", view.report_id)).into());
    }
    success(view)
}
