// ==========================================
// Designações RVM - Exportação e importação de backup
// ==========================================
// Documento JSON com uma chave por coleção. A importação é
// DESTRUTIVA: limpa todas as coleções antes da carga — a
// confirmação é responsabilidade do chamador. Publicadores,
// participações e apostilas são obrigatórios; as demais
// coleções ausentes valem listas vazias.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::event::{EventTemplate, SpecialEvent};
use crate::domain::participation::Participation;
use crate::domain::publisher::Publisher;
use crate::domain::rule::Rule;
use crate::domain::types::EntityKind;
use crate::domain::workbook::Workbook;
use crate::repository::event_repo::{EventTemplateRepository, SpecialEventRepository};
use crate::repository::history_repo::HistoryBackupRepository;
use crate::repository::participation_repo::ParticipationRepository;
use crate::repository::publisher_repo::PublisherRepository;
use crate::repository::rule_repo::RuleRepository;
use crate::repository::workbook_repo::WorkbookRepository;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

// ==========================================
// Documento de backup
// ==========================================
// As três primeiras coleções são obrigatórias no JSON;
// as demais degradam para vazio quando ausentes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub publishers: Vec<Publisher>,
    pub participations: Vec<Participation>,
    pub workbooks: Vec<Workbook>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub special_events: Vec<SpecialEvent>,
    #[serde(default)]
    pub event_templates: Vec<EventTemplate>,
}

// ==========================================
// API de backup
// ==========================================
pub struct BackupApi {
    publishers: PublisherRepository,
    participations: ParticipationRepository,
    workbooks: WorkbookRepository,
    rules: RuleRepository,
    special_events: SpecialEventRepository,
    event_templates: EventTemplateRepository,
    history: HistoryBackupRepository,
}

impl BackupApi {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            publishers: PublisherRepository::from_connection(conn.clone()),
            participations: ParticipationRepository::from_connection(conn.clone()),
            workbooks: WorkbookRepository::from_connection(conn.clone()),
            rules: RuleRepository::from_connection(conn.clone()),
            special_events: SpecialEventRepository::from_connection(conn.clone()),
            event_templates: EventTemplateRepository::from_connection(conn.clone()),
            history: HistoryBackupRepository::from_connection(conn),
        }
    }

    /// Congela todas as coleções em um documento de backup.
    pub fn export(&self) -> ApiResult<BackupDocument> {
        let document = BackupDocument {
            publishers: self.publishers.find_all()?,
            participations: self.participations.find_all()?,
            workbooks: self.workbooks.find_all()?,
            rules: self.rules.find_all()?,
            special_events: self.special_events.find_all()?,
            event_templates: self.event_templates.find_all()?,
        };
        info!(
            publicadores = document.publishers.len(),
            participacoes = document.participations.len(),
            "backup exportado"
        );
        Ok(document)
    }

    /// Documento de backup serializado, pronto para download.
    pub fn export_json(&self) -> ApiResult<String> {
        let document = self.export()?;
        serde_json::to_string_pretty(&document)
            .map_err(|e| ApiError::InvalidBackupDocument(e.to_string()))
    }

    /// Importa um documento, LIMPANDO todas as coleções antes.
    /// O chamador deve ter confirmado a operação com o usuário.
    pub fn import(&self, document: BackupDocument) -> ApiResult<()> {
        warn!("importação destrutiva iniciada: todas as coleções serão substituídas");

        self.participations.delete_all()?;
        self.publishers.delete_all()?;
        self.workbooks.delete_all()?;
        self.rules.delete_all()?;
        self.special_events.delete_all()?;
        self.event_templates.delete_all()?;
        self.history.delete_all()?;

        for publisher in &document.publishers {
            self.publishers.save(publisher)?;
        }
        self.participations.save_all(&document.participations)?;
        for workbook in &document.workbooks {
            self.workbooks.save(workbook)?;
        }
        self.rules.save_all(&document.rules)?;
        for event in &document.special_events {
            self.special_events.save(event)?;
        }
        for template in &document.event_templates {
            self.event_templates.save(template)?;
        }

        // O histórico importado vira a nova linha de base de backup
        self.history.save_backup(&document.participations)?;

        info!(
            publicadores = document.publishers.len(),
            participacoes = document.participations.len(),
            apostilas = document.workbooks.len(),
            "importação concluída"
        );
        Ok(())
    }

    /// Exclusão unificada, despachada pelo discriminante explícito
    /// da entidade — nunca por sondagem de campos. Excluir uma
    /// semana remove participações e backup atomicamente; excluir
    /// um publicador preserva o histórico (nomes por valor).
    pub fn delete_entity(&self, kind: &EntityKind) -> ApiResult<()> {
        match kind {
            EntityKind::Publisher { id } => self.publishers.delete(id)?,
            EntityKind::Participation { id } => self.participations.delete(id)?,
            EntityKind::Workbook { id } => self.workbooks.delete(id)?,
            EntityKind::Rule { id } => self.rules.delete(id)?,
            EntityKind::SpecialEvent { id } => self.special_events.delete(id)?,
            EntityKind::EventTemplate { id } => self.event_templates.delete(id)?,
            EntityKind::Week { week } => {
                self.history.delete_week(week)?;
            }
        }
        Ok(())
    }

    /// Importa a partir do JSON bruto do arquivo de backup.
    /// Chaves obrigatórias ausentes falham antes de qualquer
    /// limpeza de dados.
    pub fn import_json(&self, raw: &str) -> ApiResult<()> {
        let document: BackupDocument = serde_json::from_str(raw)
            .map_err(|e| ApiError::InvalidBackupDocument(e.to_string()))?;
        self.import(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::domain::rule::initial_rules;
    use crate::domain::types::ParticipationType;
    use crate::engine::week::calculate_part_date;

    fn sample_publisher_json() -> &'static str {
        r#"{
            "id": "pub_1",
            "name": "Eliezer Rosa",
            "gender": "brother",
            "condition": "Ancião",
            "isBaptized": true,
            "isServing": true,
            "ageGroup": "Adulto"
        }"#
    }

    fn api() -> BackupApi {
        BackupApi::from_connection(open_in_memory().unwrap())
    }

    #[test]
    fn test_export_import_roundtrip() {
        let api = api();
        let week = "4-10 de NOV, 2024";
        let publisher: Publisher = serde_json::from_str(sample_publisher_json()).unwrap();
        api.publishers.save(&publisher).unwrap();
        api.participations
            .save(&Participation::new(
                "Eliezer Rosa",
                week,
                calculate_part_date(week),
                "Presidente",
                ParticipationType::Presidente,
            ))
            .unwrap();
        api.workbooks
            .save(&Workbook::new("Apostila NOV/DEZ 2024", ""))
            .unwrap();
        api.rules.save_all(&initial_rules()).unwrap();

        let json = api.export_json().unwrap();

        let target = api2();
        target.import_json(&json).unwrap();
        let exported_again = target.export().unwrap();
        assert_eq!(exported_again.publishers.len(), 1);
        assert_eq!(exported_again.participations.len(), 1);
        assert_eq!(exported_again.workbooks.len(), 1);
        assert_eq!(exported_again.rules.len(), 6);
    }

    fn api2() -> BackupApi {
        BackupApi::from_connection(open_in_memory().unwrap())
    }

    #[test]
    fn test_import_is_destructive() {
        let api = api();
        let publisher: Publisher = serde_json::from_str(sample_publisher_json()).unwrap();
        api.publishers.save(&publisher).unwrap();

        let empty = BackupDocument::default();
        api.import(empty).unwrap();
        assert!(api.publishers.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_missing_optional_collections_default_to_empty() {
        let api = api();
        let json = format!(
            r#"{{"publishers": [{}], "participations": [], "workbooks": []}}"#,
            sample_publisher_json()
        );
        api.import_json(&json).unwrap();
        assert_eq!(api.publishers.find_all().unwrap().len(), 1);
        assert!(api.rules.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete_entity_dispatches_by_discriminant() {
        let api = api();
        let week = "4-10 de NOV, 2024";
        let publisher: Publisher = serde_json::from_str(sample_publisher_json()).unwrap();
        api.publishers.save(&publisher).unwrap();
        api.participations
            .save(&Participation::new(
                "Eliezer Rosa",
                week,
                calculate_part_date(week),
                "Presidente",
                ParticipationType::Presidente,
            ))
            .unwrap();
        api.history
            .save_backup(&api.participations.find_all().unwrap())
            .unwrap();

        api.delete_entity(&EntityKind::Publisher {
            id: "pub_1".to_string(),
        })
        .unwrap();
        assert!(api.publishers.find_all().unwrap().is_empty());
        // O histórico não é tocado pela exclusão do publicador
        assert_eq!(api.participations.find_all().unwrap().len(), 1);

        api.delete_entity(&EntityKind::Week {
            week: week.to_string(),
        })
        .unwrap();
        assert!(api.participations.find_all().unwrap().is_empty());
        assert!(api.history.find_by_week(week).unwrap().is_none());
    }

    #[test]
    fn test_missing_required_collection_is_rejected_before_clearing() {
        let api = api();
        let publisher: Publisher = serde_json::from_str(sample_publisher_json()).unwrap();
        api.publishers.save(&publisher).unwrap();

        let err = api
            .import_json(r#"{"participations": [], "workbooks": []}"#)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidBackupDocument(_)));
        // Nada foi limpo: a falha acontece antes da carga
        assert_eq!(api.publishers.find_all().unwrap().len(), 1);
    }
}
