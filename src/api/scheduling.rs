// ==========================================
// Designações RVM - API de agendamento
// ==========================================
// Liga o agendador aos repositórios: carga da fotografia,
// proposta de semana, chamada ao colaborador externo (com
// prazo do chamador), confirmação (sempre-inserir, ids
// novos a cada lote), importação histórica com casamento de
// apelidos e exclusão de semana com seu backup.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::participation::Participation;
use crate::domain::schedule::{AiScheduleResult, MeetingData, WeekProposal};
use crate::domain::types::ParticipationType;
use crate::engine::generator::{sanitize_results, CandidateGenerator};
use crate::engine::infer::infer_participation_type;
use crate::engine::name::normalize_name;
use crate::engine::repair::repair_participation;
use crate::engine::scheduler::{ScheduleOrchestrator, ScheduleSnapshot};
use crate::engine::week::{calculate_part_date, parse_week_date, standardize_week_date};
use crate::repository::event_repo::{EventTemplateRepository, SpecialEventRepository};
use crate::repository::history_repo::HistoryBackupRepository;
use crate::repository::participation_repo::ParticipationRepository;
use crate::repository::publisher_repo::PublisherRepository;
use crate::repository::rule_repo::RuleRepository;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

// ==========================================
// Linha de importação histórica
// ==========================================
// Formato das pautas antigas (importadas de PDFs fora do
// núcleo): nome em texto livre, tipo opcional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalRow {
    pub week: String,
    pub publisher_name: String,
    pub part_title: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub part_type: Option<ParticipationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

// ==========================================
// API de agendamento
// ==========================================
pub struct SchedulingApi {
    publishers: PublisherRepository,
    participations: ParticipationRepository,
    rules: RuleRepository,
    special_events: SpecialEventRepository,
    event_templates: EventTemplateRepository,
    history: HistoryBackupRepository,
    orchestrator: ScheduleOrchestrator,
}

impl SchedulingApi {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            publishers: PublisherRepository::from_connection(conn.clone()),
            participations: ParticipationRepository::from_connection(conn.clone()),
            rules: RuleRepository::from_connection(conn.clone()),
            special_events: SpecialEventRepository::from_connection(conn.clone()),
            event_templates: EventTemplateRepository::from_connection(conn.clone()),
            history: HistoryBackupRepository::from_connection(conn),
            orchestrator: ScheduleOrchestrator::new(),
        }
    }

    /// Fotografia dos dados que o agendador consome. A proposta é
    /// computação pura sobre esta cópia; nenhum I/O depois daqui.
    pub fn load_snapshot(&self) -> ApiResult<ScheduleSnapshot> {
        Ok(ScheduleSnapshot {
            publishers: self.publishers.find_all()?,
            participations: self.participations.find_all()?,
            rules: self.rules.find_all()?,
            special_events: self.special_events.find_all()?,
            event_templates: self.event_templates.find_all()?,
        })
    }

    /// Proposta de pauta para a semana, sem persistir nada.
    pub fn propose_week(&self, week: &str) -> ApiResult<WeekProposal> {
        let snapshot = self.load_snapshot()?;
        Ok(self.orchestrator.propose_week(&snapshot, week)?)
    }

    /// Chama o colaborador externo com o prazo dado. Estouro de
    /// prazo ou falha viram erro de colaborador; linhas malformadas
    /// da resposta são descartadas com log.
    pub async fn generate_candidates(
        &self,
        generator: &dyn CandidateGenerator,
        week: &str,
        timeout: Duration,
    ) -> ApiResult<Vec<AiScheduleResult>> {
        let snapshot = self.load_snapshot()?;
        let parts = self.orchestrator.required_parts(&snapshot, week)?;

        let results = tokio::time::timeout(timeout, generator.generate(week, &parts, &snapshot))
            .await
            .map_err(|_| {
                ApiError::Collaborator(format!(
                    "geração de pauta excedeu o prazo de {}s",
                    timeout.as_secs()
                ))
            })?
            .map_err(|e| ApiError::Collaborator(e.to_string()))?;

        Ok(sanitize_results(week, results))
    }

    /// Confirma uma proposta do agendador, convertendo cada
    /// designação em Participação com id novo. SEMPRE-INSERIR por
    /// decisão de projeto: confirmar o mesmo lote duas vezes produz
    /// dois conjuntos de linhas — a deduplicação pertence à revisão,
    /// não ao armazenamento. A gravação é tudo ou nada.
    pub fn confirm_proposal(&self, proposal: &WeekProposal) -> ApiResult<Vec<Participation>> {
        let mut records = Vec::new();
        for (index, assignment) in proposal.assignments.iter().enumerate() {
            let mut p = Participation::new(
                assignment.assignee.clone().unwrap_or_default(),
                &proposal.week,
                proposal.meeting_date,
                &assignment.part.title,
                assignment.part.part_type,
            );
            p.duration = assignment.part.duration;
            p.order = Some(index as u32 + 1);
            records.push(p);

            if let Some(helper) = &assignment.helper {
                let mut h = Participation::new(
                    helper.clone(),
                    &proposal.week,
                    proposal.meeting_date,
                    "Ajudante",
                    ParticipationType::Ajudante,
                );
                h.order = Some(index as u32 + 1);
                records.push(h);
            }
        }

        self.participations.save_all(&records)?;
        let week_rows = self.participations.find_by_week(&proposal.week)?;
        self.history.save_backup(&week_rows)?;
        info!(
            semana = %proposal.week,
            registros = records.len(),
            "proposta confirmada e persistida"
        );
        Ok(records)
    }

    /// Confirma a saída (já revisada) do colaborador externo para
    /// uma semana. Linhas malformadas são descartadas aqui também:
    /// a entrada continua não confiável até virar Participação.
    /// Cânticos não viram registro; a parte do evento especial é
    /// ressintetizada a partir do próprio evento, nunca da linha
    /// devolvida pelo colaborador.
    pub fn confirm_results(
        &self,
        week: &str,
        results: Vec<AiScheduleResult>,
    ) -> ApiResult<Vec<Participation>> {
        let date = calculate_part_date(week);
        let event = self.special_events.find_by_week(week)?;
        let template = match &event {
            Some(e) => self.event_templates.find_by_id(&e.template_id)?,
            None => None,
        };

        let mut records = Vec::new();
        for (index, result) in sanitize_results(week, results).into_iter().enumerate() {
            if result.part_title.to_lowercase().contains("cântico")
                || result.student_name.trim().is_empty()
            {
                continue;
            }
            if let (Some(e), Some(_)) = (&event, &template) {
                if result.part_title == e.theme {
                    continue;
                }
            }

            let part_type = infer_participation_type(&result.part_title);
            let mut p = Participation::new(
                result.student_name,
                week,
                date,
                &result.part_title,
                part_type,
            );
            p.order = Some(index as u32 + 1);
            records.push(p);

            if let Some(helper) = result.helper_name.filter(|h| !h.trim().is_empty()) {
                let mut h = Participation::new(
                    helper,
                    week,
                    date,
                    "Ajudante",
                    ParticipationType::Ajudante,
                );
                h.order = Some(index as u32 + 1);
                records.push(h);
            }
        }

        if let (Some(e), Some(_)) = (&event, &template) {
            let mut p = Participation::new(
                e.assigned_to.clone(),
                week,
                date,
                &e.theme,
                ParticipationType::VidaCrista,
            );
            p.duration = Some(e.duration);
            records.push(p);
        }

        self.participations.save_all(&records)?;
        let week_rows = self.participations.find_by_week(week)?;
        self.history.save_backup(&week_rows)?;
        info!(semana = %week, registros = records.len(), "resultados confirmados");
        Ok(records)
    }

    /// Importa pautas antigas. Nomes em texto livre são casados
    /// contra publicadores atuais (nome e apelidos, sem acento e
    /// sem caixa); não casados entram como estão, com aviso. Tipos
    /// ausentes são inferidos do título; datas vêm da semana.
    pub fn import_historical(
        &self,
        rows: Vec<HistoricalRow>,
        year_context: i32,
    ) -> ApiResult<usize> {
        let publishers = self.publishers.find_all()?;

        let mut records = Vec::new();
        for row in rows {
            let week = standardize_week_date(&row.week, year_context);
            let date = calculate_part_date(&week);

            let raw_name = row.publisher_name.trim();
            let key = normalize_name(raw_name);
            let matched = publishers.iter().find(|p| {
                normalize_name(&p.name) == key
                    || p.aliases.iter().any(|a| normalize_name(a) == key)
            });
            let name = match matched {
                Some(p) => p.name.clone(),
                None => {
                    if !raw_name.is_empty() {
                        warn!(nome = %raw_name, "nome histórico sem publicador correspondente");
                    }
                    raw_name.to_string()
                }
            };

            let part_type = row
                .part_type
                .unwrap_or_else(|| infer_participation_type(&row.part_title));
            let mut p = Participation::new(name, &week, date, &row.part_title, part_type);
            p.duration = row.duration;
            records.push(p);
        }

        self.participations.save_all(&records)?;

        // O snapshot de cada semana tocada cobre o estado atual do
        // banco, não só as linhas deste lote: a semana pode já ter
        // participações que o backup não pode perder.
        let mut touched: Vec<String> = Vec::new();
        for p in &records {
            if !touched.contains(&p.week) {
                touched.push(p.week.clone());
            }
        }
        let mut week_rows = Vec::new();
        for week in &touched {
            week_rows.extend(self.participations.find_by_week(week)?);
        }
        self.history.save_backup(&week_rows)?;

        info!(registros = records.len(), "histórico importado");
        Ok(records.len())
    }

    /// Pautas agrupadas por semana, em ordem cronológica, com as
    /// partes de cada semana na ordem da reunião. Semanas sem data
    /// reconhecível (sentinela da época zero) vêm primeiro.
    pub fn list_meetings(&self) -> ApiResult<Vec<MeetingData>> {
        let mut meetings = Vec::new();
        for week in self.participations.distinct_weeks()? {
            let mut parts = self.participations.find_by_week(&week)?;
            parts.sort_by_key(|p| p.order.unwrap_or(u32::MAX));
            meetings.push(MeetingData { week, parts });
        }
        meetings.sort_by_key(|m| parse_week_date(&m.week));
        Ok(meetings)
    }

    /// Exclui a semana inteira: participações e snapshot de backup,
    /// atomicamente.
    pub fn delete_week(&self, week: &str) -> ApiResult<usize> {
        Ok(self.history.delete_week(week)?)
    }

    /// Passo explícito de reparo de integridade: normaliza rótulos
    /// de semana malformados e datas na época zero. Invocado pela
    /// camada orquestradora na hora que ela escolher, nunca por
    /// temporizador implícito.
    pub fn repair_pass(&self) -> ApiResult<usize> {
        let all = self.participations.find_all()?;
        let mut repaired = Vec::new();
        for mut p in all {
            if repair_participation(&mut p) {
                repaired.push(p);
            }
        }
        if !repaired.is_empty() {
            self.participations.save_all(&repaired)?;
            info!(corrigidos = repaired.len(), "reparo de integridade aplicado");
        }
        Ok(repaired.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::domain::publisher::{Availability, Publisher, PublisherPrivileges, SectionPermissions};
    use crate::domain::types::{AgeGroup, Condition, Gender};
    use crate::repository::seed::seed_defaults;

    const WEEK: &str = "4-10 de NOV, 2024";

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
            aliases: vec![format!("{} Apelido", name)],
        }
    }

    fn api_with_congregation() -> SchedulingApi {
        let conn = open_in_memory().unwrap();
        seed_defaults(&conn).unwrap();
        let api = SchedulingApi::from_connection(conn);
        for p in [
            make_publisher("Eliezer Rosa", Gender::Brother, Condition::Anciao),
            make_publisher("Renato Oliveira", Gender::Brother, Condition::ServoMinisterial),
            make_publisher("Samuel Almeida", Gender::Brother, Condition::Publicador),
            make_publisher("Suellen Correa", Gender::Sister, Condition::Publicador),
        ] {
            api.publishers.save(&p).unwrap();
        }
        api
    }

    #[test]
    fn test_confirm_proposal_persists_and_backs_up() {
        let api = api_with_congregation();
        let proposal = api.propose_week(WEEK).unwrap();
        let records = api.confirm_proposal(&proposal).unwrap();

        assert!(!records.is_empty());
        let stored = api.participations.find_by_week(WEEK).unwrap();
        assert_eq!(stored.len(), records.len());
        assert!(api.history.find_by_week(WEEK).unwrap().is_some());
    }

    #[test]
    fn test_double_confirmation_duplicates_by_design() {
        let api = api_with_congregation();
        let proposal = api.propose_week(WEEK).unwrap();

        let first = api.confirm_proposal(&proposal).unwrap();
        let second = api.confirm_proposal(&proposal).unwrap();

        // Sempre-inserir: nenhuma linha é reaproveitada entre lotes
        let first_ids: Vec<&str> = first.iter().map(|p| p.id.as_str()).collect();
        assert!(second.iter().all(|p| !first_ids.contains(&p.id.as_str())));
        assert_eq!(
            api.participations.find_by_week(WEEK).unwrap().len(),
            first.len() + second.len()
        );
    }

    #[test]
    fn test_confirm_results_infers_types_and_creates_helper_rows() {
        let api = api_with_congregation();
        let results = vec![
            AiScheduleResult {
                part_title: "Leitura da Bíblia".to_string(),
                student_name: "Samuel Almeida".to_string(),
                helper_name: None,
                reasoning: None,
            },
            AiScheduleResult {
                part_title: "Iniciando conversas".to_string(),
                student_name: "Suellen Correa".to_string(),
                helper_name: Some("Renato Oliveira".to_string()),
                reasoning: None,
            },
            // Malformada: descartada, não derruba o lote
            AiScheduleResult {
                part_title: String::new(),
                student_name: "Qualquer".to_string(),
                helper_name: None,
                reasoning: None,
            },
            // Cântico nunca vira registro de participação
            AiScheduleResult {
                part_title: "Cântico 45".to_string(),
                student_name: String::new(),
                helper_name: None,
                reasoning: None,
            },
        ];

        let records = api.confirm_results(WEEK, results).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records
            .iter()
            .any(|p| p.part_type == ParticipationType::Tesouros));
        assert!(records
            .iter()
            .any(|p| p.part_type == ParticipationType::Ajudante
                && p.publisher_name == "Renato Oliveira"));
        // Data derivada da semana: quinta-feira em ano par
        assert!(records
            .iter()
            .all(|p| p.date.format("%Y-%m-%d").to_string() == "2024-11-07"));
    }

    #[test]
    fn test_confirm_results_resynthesizes_event_part() {
        let api = api_with_congregation();
        let event = crate::domain::event::SpecialEvent {
            id: "ev_visita".to_string(),
            week: WEEK.to_string(),
            template_id: "tpl_visita_sc".to_string(),
            theme: "Tema do Superintendente".to_string(),
            assigned_to: "Superintendente de Circuito".to_string(),
            duration: 30,
            configuration: crate::domain::event::EventConfiguration::default(),
        };
        api.special_events.save(&event).unwrap();

        let results = vec![
            AiScheduleResult {
                part_title: "Leitura da Bíblia".to_string(),
                student_name: "Samuel Almeida".to_string(),
                helper_name: None,
                reasoning: None,
            },
            // A linha do tema é ignorada: a parte vem do próprio evento
            AiScheduleResult {
                part_title: "Tema do Superintendente".to_string(),
                student_name: "Nome Errado".to_string(),
                helper_name: None,
                reasoning: None,
            },
        ];

        let records = api.confirm_results(WEEK, results).unwrap();
        assert_eq!(records.len(), 2);
        let event_part = records
            .iter()
            .find(|p| p.part_title == "Tema do Superintendente")
            .unwrap();
        assert_eq!(event_part.publisher_name, "Superintendente de Circuito");
        assert_eq!(event_part.part_type, ParticipationType::VidaCrista);
        assert_eq!(event_part.duration, Some(30));
    }

    #[test]
    fn test_import_historical_matches_aliases() {
        let api = api_with_congregation();
        let rows = vec![
            HistoricalRow {
                week: "4-10 de nov".to_string(),
                publisher_name: "eliezer rosa apelido".to_string(),
                part_title: "Discurso dos Tesouros".to_string(),
                part_type: None,
                duration: Some(10),
            },
            HistoricalRow {
                week: "4-10 de nov".to_string(),
                publisher_name: "Visitante Desconhecido".to_string(),
                part_title: "Oração Final".to_string(),
                part_type: None,
                duration: None,
            },
        ];

        assert_eq!(api.import_historical(rows, 2024).unwrap(), 2);
        let stored = api.participations.find_by_week(WEEK).unwrap();
        assert_eq!(stored.len(), 2);
        // Apelido casado vira o nome canônico do publicador
        assert!(stored.iter().any(|p| p.publisher_name == "Eliezer Rosa"));
        // Não casado entra como texto livre
        assert!(stored
            .iter()
            .any(|p| p.publisher_name == "Visitante Desconhecido"));
    }

    #[test]
    fn test_list_meetings_groups_and_orders_weeks() {
        let api = api_with_congregation();
        let earlier = "28 de OUT - 3 de NOV, 2024";
        for (week, title) in [
            (WEEK, "Presidente"),
            (earlier, "Leitura da Bíblia"),
            (WEEK, "Oração Inicial"),
        ] {
            api.participations
                .save(&Participation::new(
                    "Samuel Almeida",
                    week,
                    calculate_part_date(week),
                    title,
                    infer_participation_type(title),
                ))
                .unwrap();
        }

        let meetings = api.list_meetings().unwrap();
        assert_eq!(meetings.len(), 2);
        // Cronológico: a semana de outubro vem antes
        assert_eq!(meetings[0].week, earlier);
        assert_eq!(meetings[1].week, WEEK);
        assert_eq!(meetings[1].parts.len(), 2);
    }

    #[test]
    fn test_import_historical_backs_up_whole_week_not_just_batch() {
        let api = api_with_congregation();
        // A semana já tem pauta confirmada (e backup) antes do import
        let proposal = api.propose_week(WEEK).unwrap();
        let confirmed = api.confirm_proposal(&proposal).unwrap();

        api.import_historical(
            vec![HistoricalRow {
                week: "4-10 de nov".to_string(),
                publisher_name: "Samuel Almeida".to_string(),
                part_title: "Parte recuperada de pauta antiga".to_string(),
                part_type: None,
                duration: None,
            }],
            2024,
        )
        .unwrap();

        // O snapshot da semana cobre as linhas antigas E a importada
        let snapshot = api.history.find_by_week(WEEK).unwrap().unwrap();
        assert_eq!(snapshot.participations.len(), confirmed.len() + 1);
        assert!(snapshot
            .participations
            .iter()
            .any(|p| p.part_title == "Parte recuperada de pauta antiga"));
    }

    #[test]
    fn test_delete_week_clears_participations_and_backup() {
        let api = api_with_congregation();
        let proposal = api.propose_week(WEEK).unwrap();
        api.confirm_proposal(&proposal).unwrap();

        let removed = api.delete_week(WEEK).unwrap();
        assert!(removed > 0);
        assert!(api.participations.find_by_week(WEEK).unwrap().is_empty());
        assert!(api.history.find_by_week(WEEK).unwrap().is_none());
    }

    #[test]
    fn test_repair_pass_fixes_legacy_rows() {
        let api = api_with_congregation();
        let legacy = Participation::new(
            "Samuel Almeida",
            "4-10 de NOV",
            crate::engine::week::epoch_instant(),
            "Leitura da Bíblia",
            ParticipationType::Tesouros,
        );
        api.participations.save(&legacy).unwrap();

        assert_eq!(api.repair_pass().unwrap(), 1);
        let fixed = api.participations.find_by_id(&legacy.id).unwrap().unwrap();
        assert_eq!(fixed.week, "4-10 de NOV, 2024");
        assert_eq!(fixed.date.format("%Y-%m-%d").to_string(), "2024-11-07");
        // Segunda passada: nada a fazer
        assert_eq!(api.repair_pass().unwrap(), 0);
    }

    struct FailingGenerator;

    #[async_trait::async_trait]
    impl CandidateGenerator for FailingGenerator {
        async fn generate(
            &self,
            _week: &str,
            _parts: &[crate::domain::schedule::PlannedPart],
            _snapshot: &ScheduleSnapshot,
        ) -> anyhow::Result<Vec<AiScheduleResult>> {
            anyhow::bail!("serviço indisponível")
        }
    }

    struct SlowGenerator;

    #[async_trait::async_trait]
    impl CandidateGenerator for SlowGenerator {
        async fn generate(
            &self,
            _week: &str,
            _parts: &[crate::domain::schedule::PlannedPart],
            _snapshot: &ScheduleSnapshot,
        ) -> anyhow::Result<Vec<AiScheduleResult>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_generator_failure_is_collaborator_error() {
        let api = api_with_congregation();
        let err = api
            .generate_candidates(&FailingGenerator, WEEK, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Collaborator(_)));
    }

    #[tokio::test]
    async fn test_generator_timeout_is_collaborator_error() {
        let api = api_with_congregation();
        let err = api
            .generate_candidates(&SlowGenerator, WEEK, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Collaborator(_)));
    }
}
