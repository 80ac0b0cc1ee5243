// ==========================================
// Designações RVM - Semeadura de dados padrão
// ==========================================
// Passo explícito e idempotente, chamado pela camada
// orquestradora após abrir o banco: cada coleção só é
// semeada quando está vazia (conta-e-semeia).
// ==========================================

use crate::domain::event::initial_event_templates;
use crate::domain::rule::initial_rules;
use crate::repository::error::RepositoryResult;
use crate::repository::event_repo::EventTemplateRepository;
use crate::repository::rule_repo::RuleRepository;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::info;

/// O que a semeadura efetivamente inseriu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub rules_seeded: usize,
    pub templates_seeded: usize,
}

/// Semeia regras e modelos de evento padrão nas coleções vazias.
/// Chamadas repetidas não inserem nada.
pub fn seed_defaults(conn: &Arc<Mutex<Connection>>) -> RepositoryResult<SeedReport> {
    let mut report = SeedReport::default();

    let rules = RuleRepository::from_connection(conn.clone());
    if rules.count()? == 0 {
        let defaults = initial_rules();
        rules.save_all(&defaults)?;
        report.rules_seeded = defaults.len();
        info!(regras = report.rules_seeded, "regras padrão semeadas");
    }

    let templates = EventTemplateRepository::from_connection(conn.clone());
    if templates.count()? == 0 {
        let defaults = initial_event_templates();
        for template in &defaults {
            templates.save(template)?;
        }
        report.templates_seeded = defaults.len();
        info!(modelos = report.templates_seeded, "modelos de evento padrão semeados");
    }

    Ok(report)
}
