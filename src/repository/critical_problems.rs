//! Critical-problem accessors.

use serde_json::json;

use crate::errors::AppError;
use crate::models::{AffectedAsset, CriticalProblem, ProblemEvolutionPoint};

use super::Repository;

impl Repository {
    /// Recurring failures with backend-assigned trend and criticality.
    pub async fn critical_problems(
        &self,
        token: &str,
        days: u32,
    ) -> Result<Vec<CriticalProblem>, AppError> {
        self.call_rows(
            token,
            "obtener_analisis_problemas_criticos",
            json!({ "dias_periodo": days }),
        )
        .await
    }

    /// Daily failure rate of one checklist question.
    pub async fn problem_evolution(
        &self,
        token: &str,
        question_id: i64,
        days: u32,
    ) -> Result<Vec<ProblemEvolutionPoint>, AppError> {
        self.call_rows(
            token,
            "obtener_evolucion_problema",
            json!({ "pregunta_id_param": question_id, "dias_periodo": days }),
        )
        .await
    }

    pub async fn assets_affected_by_problem(
        &self,
        token: &str,
        question_id: i64,
        days: u32,
    ) -> Result<Vec<AffectedAsset>, AppError> {
        self.call_rows(
            token,
            "obtener_activos_afectados_por_problema",
            json!({ "pregunta_id_param": question_id, "dias_periodo": days }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::gateway::GatewayError;
    use crate::testing::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_critical_problems_use_period_param() {
        let gateway = fake_gateway();
        let repo = repository(&gateway);

        repo.critical_problems(SUPERVISOR_TOKEN, 60).await.unwrap();
        repo.problem_evolution(SUPERVISOR_TOKEN, 12, 90).await.unwrap();

        assert_eq!(
            gateway.rpc_calls("obtener_analisis_problemas_criticos"),
            vec![json!({ "dias_periodo": 60 })]
        );
        assert_eq!(
            gateway.rpc_calls("obtener_evolucion_problema"),
            vec![json!({ "pregunta_id_param": 12, "dias_periodo": 90 })]
        );
    }

    #[tokio::test]
    async fn test_failure_is_propagated_not_swallowed() {
        let gateway = fake_gateway();
        gateway.fail_rpc(
            "obtener_analisis_problemas_criticos",
            GatewayError::Transport("connection reset".to_string()),
        );
        let repo = repository(&gateway);

        let err = repo
            .critical_problems(SUPERVISOR_TOKEN, 30)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "connection reset");
    }
}
