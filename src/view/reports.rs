//! Report list and report detail pages.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Asset, CategoryGroup, ReportDetail, ReportSummary, UserAccount};
use crate::repository::{ReportQuery, Repository};

use super::{Degraded, Page, Session};

/// Report list filters, as carried in the page's query string.
///
/// `asset`, `from`, `to` and `problems` are applied by the backend; `operator`,
/// `shift` and `q` narrow the fetched rows locally. `to` is exclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilters {
    #[serde(default)]
    pub asset: Option<i64>,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub problems: bool,
    #[serde(default)]
    pub operator: Option<Uuid>,
    #[serde(default)]
    pub shift: Option<i32>,
    #[serde(default)]
    pub q: Option<String>,
}

impl ReportFilters {
    /// Render only the filters that are set, in a fixed order.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<String> = Vec::new();
        if let Some(asset) = self.asset {
            pairs.push(format!("asset={}", asset));
        }
        if let Some(from) = self.from {
            pairs.push(format!("from={}", from));
        }
        if let Some(to) = self.to {
            pairs.push(format!("to={}", to));
        }
        if self.problems {
            pairs.push("problems=true".to_string());
        }
        if let Some(operator) = self.operator {
            pairs.push(format!("operator={}", operator));
        }
        if let Some(shift) = self.shift {
            pairs.push(format!("shift={}", shift));
        }
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(format!("q={}", urlencoding::encode(q)));
        }
        pairs.join("&")
    }

    pub fn to_report_query(&self) -> ReportQuery {
        ReportQuery {
            from: self.from,
            to: self.to,
            asset_id: self.asset,
            problems_only: self.problems,
        }
    }

    /// Local narrowing of an already fetched row.
    pub fn matches(&self, report: &ReportSummary) -> bool {
        if let Some(operator) = self.operator {
            if report.report.operator_id != operator {
                return false;
            }
        }
        if let Some(shift) = self.shift {
            if report.report.shift != Some(shift) {
                return false;
            }
        }
        match self.q.as_deref() {
            Some(q) => report.matches_search(q.trim()),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsView {
    pub filters: ReportFilters,
    pub reports: Vec<ReportSummary>,
    /// Rows returned by the backend before local narrowing
    pub fetched: usize,
    pub assets: Vec<Asset>,
    pub operators: Vec<UserAccount>,
    pub unavailable: Vec<&'static str>,
}

pub struct ReportsPage;

#[async_trait]
impl Page for ReportsPage {
    type Filters = ReportFilters;
    type Data = ReportsView;

    const NAME: &'static str = "reports";

    async fn load(&self, repo: &Repository, session: &Session, filters: &ReportFilters) -> ReportsView {
        let token = session.token.as_str();
        let query = filters.to_report_query();

        let (reports, assets, operators) = tokio::join!(
            repo.list_reports(token, &query),
            repo.list_assets(token),
            repo.list_operators(token),
        );

        let mut degraded = Degraded::default();
        let reports = degraded.take("reports", reports);
        let fetched = reports.len();
        let reports = reports.into_iter().filter(|r| filters.matches(r)).collect();

        ReportsView {
            filters: filters.clone(),
            reports,
            fetched,
            assets: degraded.take("assets", assets),
            operators: degraded.take("operators", operators),
            unavailable: degraded.into_sections(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetailView {
    pub report_id: String,
    pub report: Option<ReportDetail>,
    pub categories: Vec<CategoryGroup>,
    pub unavailable: Vec<&'static str>,
}

pub struct ReportDetailPage;

#[async_trait]
impl Page for ReportDetailPage {
    /// Report id
    type Filters = String;
    type Data = ReportDetailView;

    const NAME: &'static str = "report-detail";

    async fn load(&self, repo: &Repository, session: &Session, report_id: &String) -> ReportDetailView {
        let mut degraded = Degraded::default();
        let report = degraded.take("report", repo.report_detail(&session.token, report_id).await);
        let categories = report.as_ref().map(ReportDetail::categories).unwrap_or_default();

        ReportDetailView {
            report_id: report_id.clone(),
            report,
            categories,
            unavailable: degraded.into_sections(),
        }
    }
}
