//! Inspection reports and their checklist answers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AssetRef, PersonRef};

/// One completed inspection checklist (`reportes_inspeccion` row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionReport {
    pub id: String,
    #[serde(alias = "activo_id")]
    pub asset_id: i64,
    #[serde(alias = "usuario_id")]
    pub operator_id: Uuid,
    #[serde(default, alias = "plantilla_id")]
    pub template_id: Option<i64>,
    #[serde(alias = "timestamp_inicio")]
    pub started_at: String,
    #[serde(alias = "timestamp_completado")]
    pub completed_at: String,
    #[serde(default, alias = "duracion_minutos")]
    pub duration_minutes: Option<f64>,
    #[serde(alias = "tiene_problemas")]
    pub has_problems: bool,
    #[serde(default, alias = "total_respuestas")]
    pub total_answers: i64,
    #[serde(default, alias = "respuestas_malas")]
    pub failed_answers: i64,
    #[serde(alias = "score_cumplimiento")]
    pub compliance_score: f64,
    #[serde(default, alias = "turno")]
    pub shift: Option<i32>,
    #[serde(default, alias = "horometro_inicial")]
    pub hour_meter_start: Option<f64>,
    #[serde(default, alias = "horometro_final")]
    pub hour_meter_end: Option<f64>,
    /// The closing hour-meter reading has not been entered yet
    #[serde(default, alias = "horometro_pendiente")]
    pub hour_meter_pending: bool,
    #[serde(default, alias = "horas_uso")]
    pub hours_used: Option<f64>,
}

/// A report row with the joined asset and operator display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    #[serde(flatten)]
    pub report: InspectionReport,
    #[serde(default, alias = "activo")]
    pub asset: Option<AssetRef>,
    #[serde(default, alias = "usuario")]
    pub operator: Option<PersonRef>,
}

impl ReportSummary {
    /// Case-insensitive match on asset name, operator name, or report id.
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        let asset_hit = self
            .asset
            .as_ref()
            .is_some_and(|a| a.name.to_lowercase().contains(&needle));
        let operator_hit = self
            .operator
            .as_ref()
            .is_some_and(|o| o.full_name.to_lowercase().contains(&needle));

        asset_hit || operator_hit || self.report.id.to_lowercase().contains(&needle)
    }
}

/// Compact row for the "recent reports" list on the dashboard home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentReport {
    pub id: String,
    #[serde(alias = "timestamp_completado")]
    pub completed_at: String,
    #[serde(alias = "tiene_problemas")]
    pub has_problems: bool,
    #[serde(alias = "score_cumplimiento")]
    pub compliance_score: f64,
    #[serde(default, alias = "activo")]
    pub asset: Option<AssetRef>,
    #[serde(default, alias = "usuario")]
    pub operator: Option<PersonRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(alias = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(alias = "texto")]
    pub text: String,
    #[serde(alias = "orden")]
    pub order: i32,
    #[serde(alias = "categoria")]
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(alias = "url_storage")]
    pub url: String,
}

/// A checklist response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: i64,
    #[serde(alias = "pregunta_id")]
    pub question_id: i64,
    #[serde(alias = "respuesta")]
    pub passed: bool,
    #[serde(default, alias = "comentario")]
    pub comment: Option<String>,
    #[serde(alias = "pregunta")]
    pub question: Question,
    #[serde(default, alias = "fotos")]
    pub photos: Vec<Photo>,
}

/// Full report with answers, questions, categories and photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDetail {
    #[serde(flatten)]
    pub report: InspectionReport,
    #[serde(alias = "activo")]
    pub asset: AssetRef,
    #[serde(alias = "usuario")]
    pub operator: PersonRef,
    #[serde(default, alias = "respuestas")]
    pub answers: Vec<Answer>,
}

/// Answers of one checklist category, in question order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub category: String,
    pub failed: usize,
    pub answers: Vec<Answer>,
}

impl ReportDetail {
    /// Group answers by category. Categories keep the order in which they
    /// first appear once answers are sorted by question order.
    pub fn categories(&self) -> Vec<CategoryGroup> {
        let mut answers = self.answers.clone();
        answers.sort_by_key(|a| a.question.order);

        let mut groups: Vec<CategoryGroup> = Vec::new();
        for answer in answers {
            let name = answer.question.category.name.clone();
            let index = match groups.iter().position(|g| g.category == name) {
                Some(index) => index,
                None => {
                    groups.push(CategoryGroup {
                        category: name,
                        failed: 0,
                        answers: Vec::new(),
                    });
                    groups.len() - 1
                }
            };
            if !answer.passed {
                groups[index].failed += 1;
            }
            groups[index].answers.push(answer);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail() -> ReportDetail {
        serde_json::from_value(json!({
            "id": "a1b2c3",
            "activo_id": 4,
            "usuario_id": "6f1c7b8e-2d4a-4a8e-9a51-1f0d2b3c4d5e",
            "plantilla_id": 1,
            "timestamp_inicio": "2024-03-05T08:00:00+00:00",
            "timestamp_completado": "2024-03-05T08:12:00+00:00",
            "duracion_minutos": 12,
            "tiene_problemas": true,
            "total_respuestas": 3,
            "respuestas_malas": 1,
            "score_cumplimiento": 66.7,
            "turno": 1,
            "horometro_inicial": 100.0,
            "horometro_final": null,
            "horometro_pendiente": true,
            "horas_uso": null,
            "activo": { "nombre": "Grua 04", "modelo": "H50", "tipo": "Horquilla" },
            "usuario": { "nombre_completo": "Pedro Soto" },
            "respuestas": [
                {
                    "id": 3, "pregunta_id": 30, "respuesta": true, "comentario": null,
                    "pregunta": { "texto": "Luces", "orden": 3, "categoria": { "nombre": "Electrico" } },
                    "fotos": []
                },
                {
                    "id": 1, "pregunta_id": 10, "respuesta": false, "comentario": "Fuga",
                    "pregunta": { "texto": "Mangueras", "orden": 1, "categoria": { "nombre": "Hidraulico" } },
                    "fotos": [{ "url_storage": "fotos/1.jpg" }]
                },
                {
                    "id": 2, "pregunta_id": 20, "respuesta": true, "comentario": null,
                    "pregunta": { "texto": "Nivel aceite", "orden": 2, "categoria": { "nombre": "Hidraulico" } },
                    "fotos": []
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_detail_from_backend_row() {
        let detail = detail();
        assert_eq!(detail.report.shift, Some(1));
        assert!(detail.report.hour_meter_pending);
        assert_eq!(detail.asset.name, "Grua 04");
        assert_eq!(detail.answers[1].photos[0].url, "fotos/1.jpg");
    }

    #[test]
    fn test_categories_grouped_in_question_order() {
        let groups = detail().categories();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "Hidraulico");
        assert_eq!(groups[0].failed, 1);
        assert_eq!(
            groups[0].answers.iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(groups[1].category, "Electrico");
        assert_eq!(groups[1].failed, 0);
    }

    #[test]
    fn test_search_matches_asset_operator_and_id() {
        let summary: ReportSummary = serde_json::from_value(json!({
            "id": "ABC-123",
            "activo_id": 4,
            "usuario_id": "6f1c7b8e-2d4a-4a8e-9a51-1f0d2b3c4d5e",
            "timestamp_inicio": "2024-03-05T08:00:00+00:00",
            "timestamp_completado": "2024-03-05T08:12:00+00:00",
            "tiene_problemas": false,
            "score_cumplimiento": 100,
            "activo": { "nombre": "Grua 04", "modelo": "H50" },
            "usuario": { "nombre_completo": "Pedro Soto" }
        }))
        .unwrap();

        assert!(summary.matches_search(""));
        assert!(summary.matches_search("grua 04"));
        assert!(summary.matches_search("SOTO"));
        assert!(summary.matches_search("abc"));
        assert!(!summary.matches_search("grua 05"));
    }
}
