//! Fleet heatmap: (asset, day) score aggregates laid out as a dense grid.
//!
//! Everything here is a pure function of the cells returned by the backend,
//! so the grid, the coloring and the click navigation are testable without
//! any rendering layer.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::models::HeatmapCell;
use crate::view::ReportFilters;

/// Number of date columns shown when the caller does not say otherwise.
pub const DEFAULT_MAX_DAYS: usize = 30;

/// Fixed score thresholds used to color a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
    NoData,
}

impl ScoreBand {
    pub const LEGEND: [ScoreBand; 6] = [
        ScoreBand::Excellent,
        ScoreBand::Good,
        ScoreBand::Fair,
        ScoreBand::Poor,
        ScoreBand::Critical,
        ScoreBand::NoData,
    ];

    /// Total over all inputs: anything that is not at least 65 (NaN included) is critical.
    pub fn for_score(score: Option<f64>) -> Self {
        match score {
            None => ScoreBand::NoData,
            Some(s) if s >= 95.0 => ScoreBand::Excellent,
            Some(s) if s >= 85.0 => ScoreBand::Good,
            Some(s) if s >= 75.0 => ScoreBand::Fair,
            Some(s) if s >= 65.0 => ScoreBand::Poor,
            Some(_) => ScoreBand::Critical,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "#22c55e",
            ScoreBand::Good => "#4ade80",
            ScoreBand::Fair => "#facc15",
            ScoreBand::Poor => "#fb923c",
            ScoreBand::Critical => "#ef4444",
            ScoreBand::NoData => "#f3f4f6",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "95-100%",
            ScoreBand::Good => "85-94%",
            ScoreBand::Fair => "75-84%",
            ScoreBand::Poor => "65-74%",
            ScoreBand::Critical => "<65%",
            ScoreBand::NoData => "No data",
        }
    }
}

/// Where a click on a populated cell leads: that asset's reports for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellNavigation {
    pub asset_id: i64,
    /// Inclusive start of the range
    pub from: NaiveDate,
    /// Exclusive end of the range, one day after `from`
    pub to: NaiveDate,
}

impl CellNavigation {
    pub fn for_day(asset_id: i64, date: NaiveDate) -> Self {
        Self {
            asset_id,
            from: date,
            // The last representable date has no successor; keep the range non-empty in spirit
            to: date.checked_add_days(Days::new(1)).unwrap_or(date),
        }
    }

    pub fn filters(&self) -> ReportFilters {
        ReportFilters {
            asset: Some(self.asset_id),
            from: Some(self.from),
            to: Some(self.to),
            ..ReportFilters::default()
        }
    }

    /// Query string understood by the report list.
    pub fn query_string(&self) -> String {
        self.filters().to_query_string()
    }
}

/// Dense asset × date grid.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapGrid {
    assets: Vec<String>,
    dates: Vec<NaiveDate>,
    cells: Vec<Vec<Option<HeatmapCell>>>,
}

impl HeatmapGrid {
    /// Rows are the distinct asset names in ascending order. Columns are the
    /// `max_days` most recent distinct dates, oldest first.
    pub fn build(source: &[HeatmapCell], max_days: usize) -> Self {
        let mut assets: Vec<String> = source.iter().map(|c| c.asset_name.clone()).collect();
        assets.sort();
        assets.dedup();

        let mut dates: Vec<NaiveDate> = source.iter().map(|c| c.date).collect();
        dates.sort_unstable_by(|a, b| b.cmp(a));
        dates.dedup();
        dates.truncate(max_days);
        dates.reverse();

        // First record wins when the backend repeats an (asset, day) pair
        let mut index: HashMap<(&str, NaiveDate), &HeatmapCell> = HashMap::new();
        for cell in source {
            index
                .entry((cell.asset_name.as_str(), cell.date))
                .or_insert(cell);
        }

        let cells = assets
            .iter()
            .map(|asset| {
                dates
                    .iter()
                    .map(|date| index.get(&(asset.as_str(), *date)).map(|c| (*c).clone()))
                    .collect()
            })
            .collect();

        Self {
            assets,
            dates,
            cells,
        }
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&HeatmapCell> {
        self.cells.get(row)?.get(col)?.as_ref()
    }

    pub fn band(&self, row: usize, col: usize) -> ScoreBand {
        ScoreBand::for_score(self.cell(row, col).map(|c| c.average_score))
    }

    /// Navigation for a click; empty cells are not clickable.
    pub fn click(&self, row: usize, col: usize) -> Option<CellNavigation> {
        let cell = self.cell(row, col)?;
        Some(CellNavigation::for_day(cell.asset_id, self.dates[col]))
    }

    /// Serializable rendition of the grid with colors, tooltips and links resolved.
    pub fn view(&self) -> HeatmapView {
        let rows = self
            .assets
            .iter()
            .enumerate()
            .map(|(row, asset)| HeatmapRow {
                asset: asset.clone(),
                cells: self
                    .dates
                    .iter()
                    .enumerate()
                    .map(|(col, date)| {
                        let cell = self.cell(row, col);
                        let band = self.band(row, col);
                        HeatmapViewCell {
                            date: *date,
                            band,
                            color: band.color(),
                            score: cell.map(|c| c.average_score),
                            inspections: cell.map(|c| c.inspections),
                            navigation: self.click(row, col),
                        }
                    })
                    .collect(),
            })
            .collect();

        HeatmapView {
            dates: self.dates.clone(),
            rows,
            legend: ScoreBand::LEGEND
                .iter()
                .map(|band| LegendEntry {
                    band: *band,
                    color: band.color(),
                    label: band.label(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapViewCell {
    pub date: NaiveDate,
    pub band: ScoreBand,
    pub color: &'static str,
    pub score: Option<f64>,
    pub inspections: Option<i64>,
    pub navigation: Option<CellNavigation>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapRow {
    pub asset: String,
    pub cells: Vec<HeatmapViewCell>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub band: ScoreBand,
    pub color: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapView {
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<HeatmapRow>,
    pub legend: Vec<LegendEntry>,
}
