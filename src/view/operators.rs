//! Operator ranking and cost-center comparison.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

use crate::models::{
    sort_operators, CostCenterAnalysis, OperatorAnalysis, OperatorSort, OperatorSummary, RateBand,
};
use crate::repository::Repository;

use super::{Degraded, Page, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorFilters {
    pub days: u32,
    pub sort: OperatorSort,
}

impl Default for OperatorFilters {
    fn default() -> Self {
        Self {
            days: 90,
            sort: OperatorSort::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorRow {
    /// 1-based position under the active sort
    pub rank: usize,
    #[serde(flatten)]
    pub operator: OperatorAnalysis,
    pub score_band: RateBand,
    pub problem_band: RateBand,
    pub seniority_years: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCenterRow {
    #[serde(flatten)]
    pub cost_center: CostCenterAnalysis,
    pub score_band: RateBand,
    pub problem_band: RateBand,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorsView {
    pub days: u32,
    pub sort: OperatorSort,
    pub summary: OperatorSummary,
    pub operators: Vec<OperatorRow>,
    pub cost_centers: Vec<CostCenterRow>,
    pub unavailable: Vec<&'static str>,
}

pub struct OperatorsPage;

#[async_trait]
impl Page for OperatorsPage {
    type Filters = OperatorFilters;
    type Data = OperatorsView;

    const NAME: &'static str = "operators";

    async fn load(&self, repo: &Repository, session: &Session, filters: &OperatorFilters) -> OperatorsView {
        let token = session.token.as_str();
        let (operators, cost_centers) = tokio::join!(
            repo.operator_analysis(token, filters.days),
            repo.cost_center_analysis(token, filters.days),
        );

        let mut degraded = Degraded::default();
        let mut operators = degraded.take("operators", operators);
        sort_operators(&mut operators, filters.sort);
        let summary = OperatorSummary::of(&operators);

        let today = Utc::now().date_naive();
        let operators = operators
            .into_iter()
            .enumerate()
            .map(|(i, operator)| OperatorRow {
                rank: i + 1,
                score_band: RateBand::for_score(operator.average_score),
                problem_band: RateBand::for_problem_percentage(operator.problem_percentage),
                seniority_years: operator.seniority_years(today),
                operator,
            })
            .collect();

        let cost_centers = degraded
            .take("costCenters", cost_centers)
            .into_iter()
            .map(|cost_center| CostCenterRow {
                score_band: RateBand::for_score(cost_center.average_score),
                problem_band: RateBand::for_problem_percentage(cost_center.problem_percentage),
                cost_center,
            })
            .collect();

        OperatorsView {
            days: filters.days,
            sort: filters.sort,
            summary,
            operators,
            cost_centers,
            unavailable: degraded.into_sections(),
        }
    }
}
