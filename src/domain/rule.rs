// ==========================================
// Designações RVM - Regras declarativas
// ==========================================
// Restrição nomeada e desligável sobre um candidato
// (publicador, tipo de parte, título de parte).
// As condições de uma regra são conjuntivas (AND); uma
// regra inativa nunca é avaliada.
// ==========================================

use crate::domain::types::{ParticipationType, RuleOperator};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Valor de fato / comparação
// ==========================================
// Os valores vêm de dados de regra gravados em JSON:
// string, booleano, número ou lista de strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FactValue {
    /// Forma textual usada pelos operadores `in`/`notIn`/`contains`.
    pub fn as_text(&self) -> String {
        match self {
            FactValue::Bool(b) => b.to_string(),
            FactValue::Number(n) => n.to_string(),
            FactValue::Text(s) => s.clone(),
            FactValue::List(items) => items.join(","),
        }
    }
}

impl From<&str> for FactValue {
    fn from(s: &str) -> Self {
        FactValue::Text(s.to_string())
    }
}

impl From<bool> for FactValue {
    fn from(b: bool) -> Self {
        FactValue::Bool(b)
    }
}

// ==========================================
// Condição de regra
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCondition {
    pub fact: String,
    pub operator: RuleOperator,
    pub value: FactValue,
}

// ==========================================
// Regra
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub description: String,
    pub is_active: bool,
    pub conditions: Vec<RuleCondition>,
}

impl Rule {
    pub fn new(description: impl Into<String>, conditions: Vec<RuleCondition>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: description.into(),
            is_active: true,
            conditions,
        }
    }
}

fn cond(fact: &str, operator: RuleOperator, value: FactValue) -> RuleCondition {
    RuleCondition {
        fact: fact.to_string(),
        operator,
        value,
    }
}

/// Conjunto padrão de regras, usado na semeadura inicial.
pub fn initial_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "Não designar publicadores que não estão atuantes.",
            vec![cond("isServing", RuleOperator::Equal, FactValue::Bool(false))],
        ),
        Rule::new(
            "Apenas anciãos ou servos ministeriais podem presidir a reunião.",
            vec![
                cond(
                    "partType",
                    RuleOperator::Equal,
                    FactValue::from(ParticipationType::Presidente.as_str()),
                ),
                cond(
                    "condition",
                    RuleOperator::NotIn,
                    FactValue::List(vec![
                        "Ancião".to_string(),
                        "Servo Ministerial".to_string(),
                    ]),
                ),
            ],
        ),
        Rule::new(
            "Apenas anciãos podem dirigir o Estudo Bíblico de Congregação.",
            vec![
                cond(
                    "partType",
                    RuleOperator::Equal,
                    FactValue::from(ParticipationType::Dirigente.as_str()),
                ),
                cond("condition", RuleOperator::NotEqual, FactValue::from("Ancião")),
            ],
        ),
        Rule::new(
            "Apenas irmãos batizados podem fazer a oração.",
            vec![
                cond(
                    "partType",
                    RuleOperator::In,
                    FactValue::List(vec![
                        ParticipationType::OracaoInicial.as_str().to_string(),
                        ParticipationType::OracaoFinal.as_str().to_string(),
                    ]),
                ),
                cond("isBaptized", RuleOperator::Equal, FactValue::Bool(false)),
            ],
        ),
        Rule::new(
            "Apenas irmãos podem ser Leitores do Estudo Bíblico.",
            vec![
                cond(
                    "partType",
                    RuleOperator::Equal,
                    FactValue::from(ParticipationType::Leitor.as_str()),
                ),
                cond("gender", RuleOperator::Equal, FactValue::from("sister")),
            ],
        ),
        Rule::new(
            "Irmãs não podem ser designadas para partes do tipo 'Discurso'.",
            vec![
                cond("gender", RuleOperator::Equal, FactValue::from("sister")),
                cond("partTitle", RuleOperator::Contains, FactValue::from("Discurso")),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_rules_are_active() {
        let rules = initial_rules();
        assert_eq!(rules.len(), 6);
        assert!(rules.iter().all(|r| r.is_active));
        assert!(rules.iter().all(|r| !r.conditions.is_empty()));
    }

    #[test]
    fn test_fact_value_untagged_serde() {
        let v: FactValue = serde_json::from_str("false").unwrap();
        assert_eq!(v, FactValue::Bool(false));
        let v: FactValue = serde_json::from_str("\"sister\"").unwrap();
        assert_eq!(v, FactValue::Text("sister".to_string()));
        let v: FactValue = serde_json::from_str("[\"Ancião\",\"Servo Ministerial\"]").unwrap();
        assert_eq!(
            v,
            FactValue::List(vec!["Ancião".to_string(), "Servo Ministerial".to_string()])
        );
    }

    #[test]
    fn test_rule_serde_roundtrip() {
        let rules = initial_rules();
        let json = serde_json::to_string(&rules).unwrap();
        let back: Vec<Rule> = serde_json::from_str(&json).unwrap();
        assert_eq!(rules, back);
        assert!(json.contains("\"isActive\":true"));
        assert!(json.contains("\"operator\":\"notIn\""));
    }
}
