//! Critical-problem endpoints.

use std::str::FromStr;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Extension;
use serde::Deserialize;

use super::{path_param, period, query_params, render, ApiResult, PeriodQuery};
use crate::auth::SessionToken;
use crate::errors::AppError;
use crate::models::ProblemFilter;
use crate::view::{
    CriticalProblemFilters, CriticalProblemsPage, CriticalProblemsView, DrilldownFilters,
    ProblemDrilldownPage, ProblemDrilldownView,
};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CriticalProblemsQuery {
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub criticality: Option<String>,
    #[serde(default)]
    pub trend: Option<String>,
}

/// Parse one filter axis. Empty and "all" mean no filter.
fn classification<T: FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>, AppError> {
    let value = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(v) => v.to_uppercase(),
    };
    if matches!(value.as_str(), "ALL" | "TODOS" | "TODAS") {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| AppError::Validation(format!("Unknown {}: {}", name, value)))
}

/// GET /api/critical-problems - Recurring failures with trend and criticality filters.
pub async fn list_critical_problems(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    params: Result<Query<CriticalProblemsQuery>, QueryRejection>,
) -> ApiResult<CriticalProblemsView> {
    render(&state, CriticalProblemsPage, &token, move || {
        let params = query_params(params)?;
        let defaults = CriticalProblemFilters::default();
        Ok(CriticalProblemFilters {
            days: period(params.days, defaults.days)?,
            filter: ProblemFilter {
                criticality: classification("criticality", params.criticality.as_deref())?,
                trend: classification("trend", params.trend.as_deref())?,
            },
        })
    })
    .await
}

/// GET /api/critical-problems/:question_id - Evolution and affected assets of one problem.
pub async fn get_problem_drilldown(
    State(state): State<AppState>,
    Extension(token): Extension<SessionToken>,
    question_id: Result<Path<i64>, PathRejection>,
    params: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<ProblemDrilldownView> {
    render(&state, ProblemDrilldownPage, &token, move || {
        Ok(DrilldownFilters {
            question_id: path_param(question_id)?,
            days: query_params(params)?.days_or(CriticalProblemFilters::default().days)?,
        })
    })
    .await
}
