//! Critical-problem analysis and per-problem drilldown.

use async_trait::async_trait;
use serde::Serialize;

use crate::models::{AffectedAsset, CriticalProblem, ProblemEvolutionPoint, ProblemFilter, ProblemSummary};
use crate::repository::Repository;

use super::{Degraded, Page, Session};

/// Window of the evolution chart, independent of the page period.
pub const EVOLUTION_DAYS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriticalProblemFilters {
    pub days: u32,
    pub filter: ProblemFilter,
}

impl Default for CriticalProblemFilters {
    fn default() -> Self {
        Self {
            days: 30,
            filter: ProblemFilter::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalProblemsView {
    pub days: u32,
    /// Counts over every row, before the criticality/trend filter
    pub summary: ProblemSummary,
    pub problems: Vec<CriticalProblem>,
    pub unavailable: Vec<&'static str>,
}

pub struct CriticalProblemsPage;

#[async_trait]
impl Page for CriticalProblemsPage {
    type Filters = CriticalProblemFilters;
    type Data = CriticalProblemsView;

    const NAME: &'static str = "critical-problems";

    async fn load(
        &self,
        repo: &Repository,
        session: &Session,
        filters: &CriticalProblemFilters,
    ) -> CriticalProblemsView {
        let mut degraded = Degraded::default();
        let problems = degraded.take(
            "problems",
            repo.critical_problems(&session.token, filters.days).await,
        );

        CriticalProblemsView {
            days: filters.days,
            summary: ProblemSummary::of(&problems),
            problems: filters.filter.apply(&problems).into_iter().cloned().collect(),
            unavailable: degraded.into_sections(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrilldownFilters {
    pub question_id: i64,
    pub days: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDrilldownView {
    pub question_id: i64,
    pub evolution: Vec<ProblemEvolutionPoint>,
    pub affected_assets: Vec<AffectedAsset>,
    pub unavailable: Vec<&'static str>,
}

pub struct ProblemDrilldownPage;

#[async_trait]
impl Page for ProblemDrilldownPage {
    type Filters = DrilldownFilters;
    type Data = ProblemDrilldownView;

    const NAME: &'static str = "problem-drilldown";

    async fn load(&self, repo: &Repository, session: &Session, filters: &DrilldownFilters) -> ProblemDrilldownView {
        let token = session.token.as_str();
        let (evolution, affected_assets) = tokio::join!(
            repo.problem_evolution(token, filters.question_id, EVOLUTION_DAYS),
            repo.assets_affected_by_problem(token, filters.question_id, filters.days),
        );

        let mut degraded = Degraded::default();
        ProblemDrilldownView {
            question_id: filters.question_id,
            evolution: degraded.take("evolution", evolution),
            affected_assets: degraded.take("affectedAssets", affected_assets),
            unavailable: degraded.into_sections(),
        }
    }
}
