//! Recurring checklist failures and their classifications.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Backend-assigned trend of a recurring failure.
///
/// Labels the dashboard does not know decode as `Unknown`, so one odd row
/// does not fail the whole list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    #[serde(alias = "EMPEORANDO")]
    Worsening,
    #[serde(alias = "MEJORANDO")]
    Improving,
    #[serde(alias = "ESTABLE")]
    Stable,
    #[default]
    #[serde(other)]
    Unknown,
}

impl FromStr for Trend {
    type Err = String;

    /// Filter values only; `Unknown` cannot be asked for.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "WORSENING" | "EMPEORANDO" => Ok(Trend::Worsening),
            "IMPROVING" | "MEJORANDO" => Ok(Trend::Improving),
            "STABLE" | "ESTABLE" => Ok(Trend::Stable),
            other => Err(format!("Unknown trend: {}", other)),
        }
    }
}

/// Backend-assigned severity of a recurring failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Criticality {
    #[serde(alias = "CRITICA")]
    Critical,
    #[serde(alias = "ALTA")]
    High,
    #[serde(alias = "MEDIA")]
    Medium,
    #[serde(alias = "BAJA")]
    Low,
    #[default]
    #[serde(other)]
    Unknown,
}

impl FromStr for Criticality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CRITICAL" | "CRITICA" => Ok(Criticality::Critical),
            "HIGH" | "ALTA" => Ok(Criticality::High),
            "MEDIUM" | "MEDIA" => Ok(Criticality::Medium),
            "LOW" | "BAJA" => Ok(Criticality::Low),
            other => Err(format!("Unknown criticality: {}", other)),
        }
    }
}

/// A null classification reads as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalProblem {
    #[serde(alias = "pregunta_id")]
    pub question_id: i64,
    #[serde(alias = "texto_pregunta")]
    pub question_text: String,
    #[serde(default, alias = "total_evaluaciones")]
    pub evaluations: i64,
    #[serde(default, alias = "total_fallos")]
    pub failures: i64,
    #[serde(default, alias = "porcentaje_fallo")]
    pub failure_percentage: f64,
    #[serde(default, alias = "afecta_activos")]
    pub affected_assets: i64,
    #[serde(default, alias = "ultima_ocurrencia")]
    pub last_occurrence: Option<String>,
    #[serde(default, alias = "tendencia", deserialize_with = "null_as_default")]
    pub trend: Trend,
    #[serde(default, alias = "criticidad", deserialize_with = "null_as_default")]
    pub criticality: Criticality,
    #[serde(default, alias = "fotos_evidencia")]
    pub evidence_photos: i64,
}

/// A failure as seen on one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProblem {
    #[serde(alias = "pregunta_id")]
    pub question_id: i64,
    #[serde(alias = "texto_pregunta")]
    pub question_text: String,
    #[serde(default, alias = "total_evaluaciones")]
    pub evaluations: i64,
    #[serde(default, alias = "total_fallos")]
    pub failures: i64,
    #[serde(default, alias = "porcentaje_fallo")]
    pub failure_percentage: f64,
    #[serde(default, alias = "ultima_ocurrencia")]
    pub last_occurrence: Option<String>,
    #[serde(default, alias = "fotos_evidencia")]
    pub evidence_photos: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemEvolutionPoint {
    #[serde(alias = "fecha")]
    pub date: NaiveDate,
    #[serde(default, alias = "total_evaluaciones")]
    pub evaluations: i64,
    #[serde(default, alias = "total_fallos")]
    pub failures: i64,
    #[serde(default, alias = "porcentaje_fallo")]
    pub failure_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedAsset {
    #[serde(alias = "activo_id")]
    pub asset_id: i64,
    #[serde(alias = "activo_nombre")]
    pub asset_name: String,
    #[serde(default, alias = "total_evaluaciones")]
    pub evaluations: i64,
    #[serde(default, alias = "total_fallos")]
    pub failures: i64,
    #[serde(default, alias = "porcentaje_fallo")]
    pub failure_percentage: f64,
    #[serde(default, alias = "ultima_ocurrencia")]
    pub last_occurrence: Option<String>,
}

/// Criticality/trend filter; `None` on either axis means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProblemFilter {
    pub criticality: Option<Criticality>,
    pub trend: Option<Trend>,
}

impl ProblemFilter {
    pub fn matches(&self, problem: &CriticalProblem) -> bool {
        self.criticality.map_or(true, |c| c == problem.criticality)
            && self.trend.map_or(true, |t| t == problem.trend)
    }

    pub fn apply<'a>(&self, problems: &'a [CriticalProblem]) -> Vec<&'a CriticalProblem> {
        problems.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Header figures of the critical-problems page, over the unfiltered rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSummary {
    pub total: usize,
    pub critical: usize,
    pub worsening: usize,
    /// Largest number of assets hit by a single problem
    pub most_assets_affected: i64,
}

impl ProblemSummary {
    pub fn of(problems: &[CriticalProblem]) -> Self {
        Self {
            total: problems.len(),
            critical: problems
                .iter()
                .filter(|p| p.criticality == Criticality::Critical)
                .count(),
            worsening: problems
                .iter()
                .filter(|p| p.trend == Trend::Worsening)
                .count(),
            most_assets_affected: problems
                .iter()
                .map(|p| p.affected_assets)
                .max()
                .unwrap_or(0),
        }
    }
}
