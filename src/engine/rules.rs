// ==========================================
// Designações RVM - Motor de regras
// ==========================================
// Avaliação declarativa de condições (fato, operador,
// valor) sobre um candidato (publicador, tipo, título).
// Uma regra dispara (bloqueia) se TODAS as suas condições
// casam; o candidato é excluído se QUALQUER regra ativa
// dispara. Fatos desconhecidos nunca casam: dados de regra
// legados degradam sem erro.
// ==========================================

use crate::domain::publisher::Publisher;
use crate::domain::rule::{FactValue, Rule, RuleCondition};
use crate::domain::types::{ParticipationType, RuleOperator};
use std::collections::HashMap;

// ==========================================
// Bolsa de fatos (Fact Bag)
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct FactBag {
    facts: HashMap<String, FactValue>,
}

impl FactBag {
    /// Fatos derivados de um par (publicador, parte candidata).
    /// Inclui os privilégios individuais como fatos extras para
    /// conjuntos de regras futuros.
    pub fn for_candidate(
        publisher: &Publisher,
        part_type: ParticipationType,
        part_title: &str,
    ) -> Self {
        let mut facts = HashMap::new();
        facts.insert("isServing".into(), FactValue::Bool(publisher.is_serving));
        facts.insert("isBaptized".into(), FactValue::Bool(publisher.is_baptized));
        facts.insert("gender".into(), FactValue::from(publisher.gender.as_str()));
        facts.insert(
            "condition".into(),
            FactValue::from(publisher.condition.as_str()),
        );
        facts.insert("ageGroup".into(), FactValue::Text(publisher.age_group.to_string()));
        facts.insert(
            "isHelperOnly".into(),
            FactValue::Bool(publisher.is_helper_only),
        );
        facts.insert("partType".into(), FactValue::from(part_type.as_str()));
        facts.insert("partTitle".into(), FactValue::Text(part_title.to_string()));
        facts.insert(
            "canGiveTalks".into(),
            FactValue::Bool(publisher.privileges.can_give_talks),
        );
        facts.insert(
            "canConductCBS".into(),
            FactValue::Bool(publisher.privileges.can_conduct_cbs),
        );
        facts.insert(
            "canReadCBS".into(),
            FactValue::Bool(publisher.privileges.can_read_cbs),
        );
        facts.insert("canPray".into(), FactValue::Bool(publisher.privileges.can_pray));
        facts.insert(
            "canPreside".into(),
            FactValue::Bool(publisher.privileges.can_preside),
        );
        Self { facts }
    }

    pub fn insert(&mut self, fact: impl Into<String>, value: FactValue) {
        self.facts.insert(fact.into(), value);
    }

    pub fn get(&self, fact: &str) -> Option<&FactValue> {
        self.facts.get(fact)
    }
}

// ==========================================
// Motor de regras
// ==========================================
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Uma regra bloqueia o candidato sse está ativa E todas as
    /// suas condições casam com a bolsa de fatos.
    pub fn rule_blocks(rule: &Rule, facts: &FactBag) -> bool {
        if !rule.is_active {
            return false;
        }
        rule.conditions
            .iter()
            .all(|cond| Self::condition_matches(cond, facts))
    }

    /// Primeira regra ativa que bloqueia o candidato, se houver.
    /// A descrição da regra serve de razão legível.
    pub fn first_block<'a>(&'a self, facts: &FactBag) -> Option<&'a Rule> {
        self.rules.iter().find(|r| Self::rule_blocks(r, facts))
    }

    /// Candidato válido sse nenhuma regra ativa o bloqueia.
    pub fn is_blocked(&self, facts: &FactBag) -> bool {
        self.first_block(facts).is_some()
    }

    fn condition_matches(cond: &RuleCondition, facts: &FactBag) -> bool {
        // Fato desconhecido: nunca casa (degradação graciosa)
        let Some(fact_value) = facts.get(&cond.fact) else {
            return false;
        };

        match cond.operator {
            RuleOperator::Equal => Self::values_equal(fact_value, &cond.value),
            RuleOperator::NotEqual => !Self::values_equal(fact_value, &cond.value),
            RuleOperator::In => match &cond.value {
                FactValue::List(items) => items.contains(&fact_value.as_text()),
                _ => false,
            },
            RuleOperator::NotIn => match &cond.value {
                FactValue::List(items) => !items.contains(&fact_value.as_text()),
                _ => false,
            },
            // Subcadeia sensível a maiúsculas, ambos como texto
            RuleOperator::Contains => fact_value.as_text().contains(&cond.value.as_text()),
        }
    }

    fn values_equal(a: &FactValue, b: &FactValue) -> bool {
        match (a, b) {
            (FactValue::Bool(x), FactValue::Bool(y)) => x == y,
            (FactValue::Number(x), FactValue::Number(y)) => (x - y).abs() < f64::EPSILON,
            (FactValue::Text(x), FactValue::Text(y)) => x == y,
            (FactValue::List(x), FactValue::List(y)) => x == y,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::publisher::{Availability, PublisherPrivileges, SectionPermissions};
    use crate::domain::rule::initial_rules;
    use crate::domain::types::{AgeGroup, Condition, Gender};

    fn make_publisher(name: &str, gender: Gender, condition: Condition) -> Publisher {
        Publisher {
            id: name.to_lowercase().replace(' ', "_"),
            name: name.to_string(),
            gender,
            condition,
            phone: String::new(),
            is_baptized: true,
            is_serving: true,
            age_group: AgeGroup::Adulto,
            parent_ids: Vec::new(),
            is_helper_only: false,
            can_pair_with_non_parent: false,
            privileges: PublisherPrivileges::default(),
            privileges_by_section: SectionPermissions::default(),
            availability: Availability::default(),
            aliases: Vec::new(),
        }
    }

    #[test]
    fn test_not_serving_blocked_for_every_part_type() {
        let engine = RuleEngine::new(initial_rules());
        let mut publisher = make_publisher("Renato Oliveira", Gender::Brother, Condition::Anciao);
        publisher.is_serving = false;

        let all_types = [
            ParticipationType::Presidente,
            ParticipationType::OracaoInicial,
            ParticipationType::Tesouros,
            ParticipationType::Ministerio,
            ParticipationType::VidaCrista,
            ParticipationType::Dirigente,
            ParticipationType::Leitor,
            ParticipationType::Ajudante,
        ];
        for t in all_types {
            let facts = FactBag::for_candidate(&publisher, t, "Parte qualquer");
            assert!(engine.is_blocked(&facts), "tipo {t} deveria bloquear");
        }
    }

    #[test]
    fn test_sister_blocked_for_discurso_title() {
        let engine = RuleEngine::new(initial_rules());
        let sister = make_publisher("Suellen Correa", Gender::Sister, Condition::Publicador);

        let facts = FactBag::for_candidate(&sister, ParticipationType::Ministerio, "Discurso");
        assert!(engine.is_blocked(&facts));

        // Sensível a maiúsculas: "discurso" minúsculo não casa
        let facts =
            FactBag::for_candidate(&sister, ParticipationType::Ministerio, "discurso breve");
        assert!(!engine.is_blocked(&facts));
    }

    #[test]
    fn test_elder_never_blocked_from_presiding() {
        let engine = RuleEngine::new(initial_rules());
        let elder = make_publisher("Eliezer Rosa", Gender::Brother, Condition::Anciao);
        let facts = FactBag::for_candidate(&elder, ParticipationType::Presidente, "Presidente");
        assert!(!engine.is_blocked(&facts));
    }

    #[test]
    fn test_publicador_blocked_from_presiding_and_conducting() {
        let engine = RuleEngine::new(initial_rules());
        let publisher = make_publisher("Samuel Almeida", Gender::Brother, Condition::Publicador);

        let facts = FactBag::for_candidate(&publisher, ParticipationType::Presidente, "Presidente");
        let block = engine.first_block(&facts).expect("deveria bloquear");
        assert!(block.description.contains("presidir"));

        let facts = FactBag::for_candidate(
            &publisher,
            ParticipationType::Dirigente,
            "Estudo bíblico de congregação",
        );
        assert!(engine.is_blocked(&facts));
    }

    #[test]
    fn test_unbaptized_blocked_from_prayer() {
        let engine = RuleEngine::new(initial_rules());
        let mut publisher = make_publisher("André Luiz", Gender::Brother, Condition::Publicador);
        publisher.is_baptized = false;

        let facts =
            FactBag::for_candidate(&publisher, ParticipationType::OracaoFinal, "Oração Final");
        assert!(engine.is_blocked(&facts));

        publisher.is_baptized = true;
        let facts =
            FactBag::for_candidate(&publisher, ParticipationType::OracaoFinal, "Oração Final");
        assert!(!engine.is_blocked(&facts));
    }

    #[test]
    fn test_inactive_rule_is_never_evaluated() {
        let mut rules = initial_rules();
        for r in &mut rules {
            r.is_active = false;
        }
        let engine = RuleEngine::new(rules);
        let mut publisher = make_publisher("Inativo", Gender::Brother, Condition::Publicador);
        publisher.is_serving = false;

        let facts = FactBag::for_candidate(&publisher, ParticipationType::Presidente, "Presidente");
        assert!(!engine.is_blocked(&facts));
    }

    #[test]
    fn test_unknown_fact_never_matches() {
        let rule = Rule::new(
            "Regra com fato futuro",
            vec![RuleCondition {
                fact: "fatoQueNaoExiste".to_string(),
                operator: RuleOperator::Equal,
                value: FactValue::Bool(true),
            }],
        );
        let engine = RuleEngine::new(vec![rule]);
        let publisher = make_publisher("Qualquer", Gender::Brother, Condition::Publicador);
        let facts = FactBag::for_candidate(&publisher, ParticipationType::Tesouros, "Parte");
        assert!(!engine.is_blocked(&facts));
    }
}
