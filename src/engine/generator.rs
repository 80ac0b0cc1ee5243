// ==========================================
// Designações RVM - Colaborador externo de geração
// ==========================================
// Fronteira assíncrona com um gerador de sugestões
// (serviço de IA ou outro). A saída é tratada como NÃO
// confiável: linhas malformadas são descartadas com log,
// nunca derrubam o fluxo.
// ==========================================

use crate::domain::schedule::{AiScheduleResult, PlannedPart};
use crate::engine::scheduler::ScheduleSnapshot;
use async_trait::async_trait;
use tracing::warn;

/// Colaborador que propõe designações para as partes de uma
/// semana. Implementações típicas chamam um serviço externo.
#[async_trait]
pub trait CandidateGenerator: Send + Sync {
    async fn generate(
        &self,
        week: &str,
        parts: &[PlannedPart],
        snapshot: &ScheduleSnapshot,
    ) -> anyhow::Result<Vec<AiScheduleResult>>;
}

/// Reconciliação da saída do colaborador: descarta linhas sem
/// título e linhas sem estudante em partes que exigem um
/// (cânticos são a exceção legítima).
pub fn sanitize_results(week: &str, results: Vec<AiScheduleResult>) -> Vec<AiScheduleResult> {
    results
        .into_iter()
        .filter(|r| {
            if r.part_title.trim().is_empty() {
                warn!(semana = %week, "linha descartada: título de parte em branco");
                return false;
            }
            let is_song = r.part_title.to_lowercase().contains("cântico");
            if !is_song && r.student_name.trim().is_empty() {
                warn!(
                    semana = %week,
                    parte = %r.part_title,
                    "linha descartada: estudante em branco"
                );
                return false;
            }
            true
        })
        .collect()
}
