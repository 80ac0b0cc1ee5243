// ==========================================
// Designações RVM - Eventos especiais e modelos
// ==========================================
// Um SpecialEvent substitui a pauta normal de uma semana
// segundo o impacto definido pelo seu EventTemplate.
// No máximo um evento por semana (índice UNIQUE em `week`).
// ==========================================

use crate::domain::types::{EventImpactAction, ParticipationType};
use serde::{Deserialize, Serialize};

// ==========================================
// Alvo do impacto: um tipo ou uma lista de tipos
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImpactTarget {
    One(ParticipationType),
    Many(Vec<ParticipationType>),
}

impl ImpactTarget {
    pub fn contains(&self, part_type: ParticipationType) -> bool {
        match self {
            ImpactTarget::One(t) => *t == part_type,
            ImpactTarget::Many(list) => list.contains(&part_type),
        }
    }
}

// ==========================================
// Impacto de evento
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventImpact {
    pub action: EventImpactAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<ImpactTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reassign_target: Option<ParticipationType>,
}

// ==========================================
// Padrões de instanciação do modelo
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefaults {
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub requires_theme: bool,
    pub requires_assignee: bool,
}

// ==========================================
// Modelo de evento (Event Template)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub impact: EventImpact,
    pub defaults: EventDefaults,
}

// ==========================================
// Configuração opcional do evento
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeReduction {
    pub target_type: ParticipationType,
    pub minutes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_reduction: Option<TimeReduction>,
}

// ==========================================
// Evento especial (Special Event)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialEvent {
    pub id: String,
    pub week: String,
    pub template_id: String,
    pub theme: String,
    pub assigned_to: String,
    pub duration: u32,
    #[serde(default)]
    pub configuration: EventConfiguration,
}

/// Modelos padrão de evento, usados na semeadura inicial.
pub fn initial_event_templates() -> Vec<EventTemplate> {
    vec![
        EventTemplate {
            id: "tpl_visita_sc".to_string(),
            name: "Visita do superintendente de circuito".to_string(),
            description: "A pauta é ajustada para a visita. A parte principal da 'Nossa Vida \
                          Cristã' é substituída por um discurso de serviço."
                .to_string(),
            impact: EventImpact {
                action: EventImpactAction::ReplacePart,
                target_type: Some(ImpactTarget::One(ParticipationType::Dirigente)),
                reassign_target: None,
            },
            defaults: EventDefaults {
                duration: 30,
                theme: None,
                requires_theme: true,
                requires_assignee: true,
            },
        },
        EventTemplate {
            id: "tpl_memorial".to_string(),
            name: "Memorial da morte de Cristo".to_string(),
            description: "Toda a reunião do meio de semana é cancelada e substituída pela \
                          celebração do Memorial."
                .to_string(),
            impact: EventImpact {
                action: EventImpactAction::ReplaceSection,
                target_type: Some(ImpactTarget::Many(vec![
                    ParticipationType::Tesouros,
                    ParticipationType::Ministerio,
                    ParticipationType::VidaCrista,
                    ParticipationType::Dirigente,
                    ParticipationType::Leitor,
                ])),
                reassign_target: None,
            },
            defaults: EventDefaults {
                duration: 45,
                theme: Some("Celebração Anual da Morte de Cristo".to_string()),
                requires_theme: false,
                requires_assignee: true,
            },
        },
    ]
}
