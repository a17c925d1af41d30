//! Fleet heatmap page.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::heatmap::{HeatmapGrid, HeatmapView, DEFAULT_MAX_DAYS};
use crate::repository::Repository;

use super::{Degraded, Page, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeatmapFilters {
    pub days: u32,
}

impl Default for HeatmapFilters {
    fn default() -> Self {
        Self { days: 30 }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapPageView {
    pub days: u32,
    pub heatmap: HeatmapView,
    pub unavailable: Vec<&'static str>,
}

pub struct HeatmapPage;

#[async_trait]
impl Page for HeatmapPage {
    type Filters = HeatmapFilters;
    type Data = HeatmapPageView;

    const NAME: &'static str = "heatmap";

    async fn load(&self, repo: &Repository, session: &Session, filters: &HeatmapFilters) -> HeatmapPageView {
        let mut degraded = Degraded::default();
        let cells = degraded.take("heatmap", repo.heatmap(&session.token, filters.days).await);

        // The query window may be wider than the grid; columns stay capped
        let grid = HeatmapGrid::build(&cells, DEFAULT_MAX_DAYS);
        tracing::debug!(
            assets = grid.assets().len(),
            dates = grid.dates().len(),
            "Built heatmap grid"
        );

        HeatmapPageView {
            days: filters.days,
            heatmap: grid.view(),
            unavailable: degraded.into_sections(),
        }
    }
}
