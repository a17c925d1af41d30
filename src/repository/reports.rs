//! Inspection report accessors.

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::gateway::TableQuery;
use crate::models::{ReportDetail, ReportSummary, UserAccount};

use super::Repository;

const SUMMARY_SELECT: &str = r#"
    *,
    activo:activos!inner(nombre, modelo),
    usuario:usuarios!inner(nombre_completo)
"#;

const DETAIL_SELECT: &str = r#"
    *,
    activo:activos!inner(nombre, modelo, tipo),
    usuario:usuarios!inner(nombre_completo),
    respuestas:respuestas_reporte(
        id,
        pregunta_id,
        respuesta,
        comentario,
        pregunta:preguntas_plantilla!inner(
            texto,
            orden,
            categoria:categorias_plantilla!inner(nombre)
        ),
        fotos:fotos_respuesta(url_storage)
    )
"#;

/// Server-side report filters. `to` is exclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub asset_id: Option<i64>,
    pub problems_only: bool,
}

impl ReportQuery {
    fn table_query(&self) -> TableQuery {
        let mut query = TableQuery::table("reportes_inspeccion")
            .select(SUMMARY_SELECT)
            .order("timestamp_completado", false);

        if let Some(from) = self.from {
            query = query.gte("timestamp_completado", from);
        }
        if let Some(to) = self.to {
            query = query.lt("timestamp_completado", to);
        }
        if let Some(asset_id) = self.asset_id {
            query = query.eq("activo_id", asset_id);
        }
        if self.problems_only {
            query = query.eq("tiene_problemas", true);
        }
        query
    }
}

impl Repository {
    /// Reports matching the filters, newest first.
    pub async fn list_reports(
        &self,
        token: &str,
        filters: &ReportQuery,
    ) -> Result<Vec<ReportSummary>, AppError> {
        self.read(token, &filters.table_query()).await
    }

    /// One report with its answers, questions, categories and photos.
    pub async fn report_detail(
        &self,
        token: &str,
        report_id: &str,
    ) -> Result<Option<ReportDetail>, AppError> {
        let query = TableQuery::table("reportes_inspeccion")
            .select(DETAIL_SELECT)
            .eq("id", report_id)
            .limit(1);
        let mut rows: Vec<ReportDetail> = self.read(token, &query).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    /// Operator accounts for the report filter dropdown.
    pub async fn list_operators(&self, token: &str) -> Result<Vec<UserAccount>, AppError> {
        let query = TableQuery::table("usuarios")
            .select("id, nombre_completo, rol")
            .eq("rol", "OPERADOR")
            .order("nombre_completo", true);
        self.read(token, &query).await
    }
}
