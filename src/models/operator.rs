//! Operator and cost-center performance projections.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorAnalysis {
    #[serde(alias = "usuario_id")]
    pub operator_id: Uuid,
    #[serde(alias = "nombre_completo")]
    pub full_name: String,
    #[serde(default, alias = "rut")]
    pub national_id: Option<String>,
    #[serde(default, alias = "id_alternativo")]
    pub alternate_id: Option<String>,
    #[serde(default, alias = "centro_costo")]
    pub cost_center: Option<String>,
    #[serde(default, alias = "fecha_ingreso")]
    pub hired_on: Option<NaiveDate>,
    #[serde(default, alias = "cargo")]
    pub position: Option<String>,
    #[serde(default, alias = "total_inspecciones")]
    pub inspections: i64,
    #[serde(default, alias = "inspecciones_con_problemas")]
    pub inspections_with_problems: i64,
    #[serde(default, alias = "porcentaje_problemas")]
    pub problem_percentage: f64,
    #[serde(default, alias = "score_promedio")]
    pub average_score: f64,
    #[serde(default, alias = "duracion_promedio_minutos")]
    pub average_duration_minutes: f64,
    #[serde(default, alias = "ultima_inspeccion")]
    pub last_inspection_at: Option<String>,
    #[serde(default, alias = "dias_desde_ultima")]
    pub days_since_last: f64,
}

impl OperatorAnalysis {
    /// Whole years since hire date.
    pub fn seniority_years(&self, today: NaiveDate) -> Option<i64> {
        self.hired_on
            .map(|hired| (today - hired).num_days().div_euclid(365))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCenterAnalysis {
    #[serde(alias = "centro_costo")]
    pub cost_center: String,
    #[serde(default, alias = "total_operadores")]
    pub operators: i64,
    #[serde(default, alias = "total_inspecciones")]
    pub inspections: i64,
    #[serde(default, alias = "inspecciones_con_problemas")]
    pub inspections_with_problems: i64,
    #[serde(default, alias = "porcentaje_problemas")]
    pub problem_percentage: f64,
    #[serde(default, alias = "score_promedio")]
    pub average_score: f64,
}

/// Ranking keys offered on the operators page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorSort {
    /// Most inspections first
    #[default]
    Inspections,
    /// Highest average score first
    Score,
    /// Lowest problem percentage first
    Problems,
}

impl FromStr for OperatorSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inspections" | "inspecciones" => Ok(OperatorSort::Inspections),
            "score" => Ok(OperatorSort::Score),
            "problems" | "problemas" => Ok(OperatorSort::Problems),
            other => Err(format!("Unknown sort key: {}", other)),
        }
    }
}

/// Stable sort of operator rows by the given key.
pub fn sort_operators(operators: &mut [OperatorAnalysis], key: OperatorSort) {
    operators.sort_by(|a, b| compare_operators(a, b, key));
}

fn compare_operators(a: &OperatorAnalysis, b: &OperatorAnalysis, key: OperatorSort) -> Ordering {
    match key {
        OperatorSort::Inspections => b.inspections.cmp(&a.inspections),
        OperatorSort::Score => b.average_score.total_cmp(&a.average_score),
        OperatorSort::Problems => a.problem_percentage.total_cmp(&b.problem_percentage),
    }
}

/// Problem-rate classification shared by operators and cost centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateBand {
    Good,
    Warning,
    Bad,
}

impl RateBand {
    pub fn for_problem_percentage(pct: f64) -> Self {
        if pct < 10.0 {
            RateBand::Good
        } else if pct < 20.0 {
            RateBand::Warning
        } else {
            RateBand::Bad
        }
    }

    pub fn for_score(score: f64) -> Self {
        if score >= 95.0 {
            RateBand::Good
        } else if score >= 85.0 {
            RateBand::Warning
        } else {
            RateBand::Bad
        }
    }
}

/// Header figures of the operators page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorSummary {
    pub operators: usize,
    pub average_score: f64,
    pub total_inspections: i64,
}

impl OperatorSummary {
    pub fn of(operators: &[OperatorAnalysis]) -> Self {
        if operators.is_empty() {
            return Self::default();
        }
        let score_sum: f64 = operators.iter().map(|o| o.average_score).sum();
        let average = score_sum / operators.len() as f64;
        Self {
            operators: operators.len(),
            average_score: (average * 10.0).round() / 10.0,
            total_inspections: operators.iter().map(|o| o.inspections).sum(),
        }
    }
}
