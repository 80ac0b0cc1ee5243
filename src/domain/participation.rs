// ==========================================
// Designações RVM - Entidade Participação
// ==========================================
// Uma designação de um nome (possivelmente vazio, ex.
// cânticos) a uma parte de uma semana. O nome é
// desnormalizado de propósito: excluir um publicador não
// corrompe o histórico.
// ==========================================

use crate::domain::types::ParticipationType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Invariante: todas as participações com o mesmo `week`
// pertencem à mesma reunião; `date` é derivável de `week`
// pelo normalizador de semanas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    pub id: String,
    pub publisher_name: String,
    pub week: String,
    pub date: DateTime<Utc>,
    pub part_title: String,
    #[serde(rename = "type")]
    pub part_type: ParticipationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<i32>,
}

impl Participation {
    /// Cria uma participação nova com id gerado.
    pub fn new(
        publisher_name: impl Into<String>,
        week: impl Into<String>,
        date: DateTime<Utc>,
        part_title: impl Into<String>,
        part_type: ParticipationType,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            publisher_name: publisher_name.into(),
            week: week.into(),
            date,
            part_title: part_title.into(),
            part_type,
            duration: None,
            order: None,
            part_number: None,
        }
    }
}

// ==========================================
// Snapshot de backup do histórico
// ==========================================
// Uma entrada por semana: a pauta completa congelada no
// momento da importação/atualização.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryBackupItem {
    pub id: String,
    pub week: String,
    pub participations: Vec<Participation>,
    pub imported_at: DateTime<Utc>,
}

impl HistoryBackupItem {
    pub fn new(week: impl Into<String>, participations: Vec<Participation>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            week: week.into(),
            participations,
            imported_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generates_distinct_ids() {
        let a = Participation::new(
            "Eliezer Rosa",
            "4-10 de NOV, 2024",
            Utc::now(),
            "Presidente",
            ParticipationType::Presidente,
        );
        let b = Participation::new(
            "Eliezer Rosa",
            "4-10 de NOV, 2024",
            Utc::now(),
            "Presidente",
            ParticipationType::Presidente,
        );
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serde_field_names_match_backup_format() {
        let p = Participation::new(
            "Samuel Almeida",
            "4-10 de NOV, 2024",
            Utc::now(),
            "Leitura da Bíblia",
            ParticipationType::Tesouros,
        );
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"publisherName\""));
        assert!(json.contains("\"partTitle\""));
        assert!(json.contains("\"type\":\"Tesouros da Palavra de Deus\""));
        // Opcionais ausentes não aparecem no backup
        assert!(!json.contains("\"duration\""));
    }
}
