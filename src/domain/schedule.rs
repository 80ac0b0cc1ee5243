// ==========================================
// Designações RVM - Estruturas de proposta de pauta
// ==========================================
// Saída do agendador antes da confirmação. Nada aqui é
// persistido diretamente: a revisão externa converte em
// Participações.
// ==========================================

use crate::domain::participation::Participation;
use crate::domain::types::ParticipationType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Resultado bruto do colaborador de geração
// ==========================================
// Entrada NÃO confiável: linhas malformadas são
// descartadas na reconciliação. Os campos de exibição
// (raciocínio/confiança) são opacos para o núcleo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiScheduleResult {
    pub part_title: String,
    pub student_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

// ==========================================
// Parte planejada de uma semana
// ==========================================
// Unidade sobre a qual o resolvedor de eventos e o
// agendador operam antes de existir designação.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedPart {
    pub title: String,
    pub part_type: ParticipationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl PlannedPart {
    pub fn new(title: impl Into<String>, part_type: ParticipationType) -> Self {
        Self {
            title: title.into(),
            part_type,
            duration: None,
        }
    }

    pub fn with_duration(title: impl Into<String>, part_type: ParticipationType, minutes: u32) -> Self {
        Self {
            title: title.into(),
            part_type,
            duration: Some(minutes),
        }
    }
}

// ==========================================
// Designação proposta
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedAssignment {
    pub part: PlannedPart,
    /// Vazio quando nenhum publicador elegível foi encontrado.
    pub assignee: Option<String>,
    /// Ajudante, apenas para partes do ministério.
    pub helper: Option<String>,
    /// Parte sem elegíveis: exige atenção manual do revisor.
    pub needs_attention: bool,
    /// Razões de decisão, no estilo dos motores (sempre explicáveis).
    pub reasons: Vec<String>,
}

// ==========================================
// Proposta de semana
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekProposal {
    pub week: String,
    pub meeting_date: DateTime<Utc>,
    pub assignments: Vec<ProposedAssignment>,
}

impl WeekProposal {
    /// Partes sem designado que exigem revisão manual.
    pub fn unassigned_parts(&self) -> Vec<&ProposedAssignment> {
        self.assignments.iter().filter(|a| a.needs_attention).collect()
    }
}

// ==========================================
// Agrupamento de pauta por semana
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingData {
    pub week: String,
    pub parts: Vec<Participation>,
}
