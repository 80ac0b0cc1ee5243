// ==========================================
// Designações RVM - Agendador de designações
// ==========================================
// Orquestra a proposta de pauta de uma semana: resolve as
// partes necessárias (programa padrão ajustado por evento
// especial), calcula elegíveis por parte e distribui por
// rodízio (menos recente primeiro). Partes sem elegíveis
// saem sem designado e marcadas para atenção manual; o
// lote nunca falha por uma parte desfalcada.
// ==========================================

use crate::domain::event::{EventTemplate, SpecialEvent};
use crate::domain::participation::Participation;
use crate::domain::publisher::Publisher;
use crate::domain::rule::Rule;
use crate::domain::schedule::{PlannedPart, ProposedAssignment, WeekProposal};
use crate::domain::types::ParticipationType;
use crate::engine::events::{EventError, EventImpactResolver};
use crate::engine::name::normalize_name;
use crate::engine::pairing::validate_pairing;
use crate::engine::rules::{FactBag, RuleEngine};
use crate::engine::week::calculate_part_date;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Programa padrão da reunião de meio de semana.
pub fn standard_weekly_parts() -> Vec<PlannedPart> {
    vec![
        PlannedPart::new("Presidente", ParticipationType::Presidente),
        PlannedPart::new("Oração Inicial", ParticipationType::OracaoInicial),
        PlannedPart::with_duration("Discurso dos Tesouros", ParticipationType::Tesouros, 10),
        PlannedPart::with_duration("Joias Espirituais", ParticipationType::Tesouros, 10),
        PlannedPart::with_duration("Leitura da Bíblia", ParticipationType::Tesouros, 4),
        PlannedPart::with_duration("Iniciando conversas", ParticipationType::Ministerio, 3),
        PlannedPart::with_duration("Cultivando o interesse", ParticipationType::Ministerio, 4),
        PlannedPart::with_duration("Fazendo discípulos", ParticipationType::Ministerio, 5),
        PlannedPart::with_duration("Necessidades Locais", ParticipationType::VidaCrista, 15),
        PlannedPart::with_duration(
            "Estudo bíblico de congregação",
            ParticipationType::Dirigente,
            30,
        ),
        PlannedPart::new("Leitor do EBC", ParticipationType::Leitor),
        PlannedPart::new("Comentários Finais", ParticipationType::ComentariosFinais),
        PlannedPart::new("Oração Final", ParticipationType::OracaoFinal),
    ]
}

// ==========================================
// Fotografia dos dados de entrada
// ==========================================
// O agendador não acessa o banco: recebe tudo carregado.
#[derive(Debug, Clone, Default)]
pub struct ScheduleSnapshot {
    pub publishers: Vec<Publisher>,
    pub participations: Vec<Participation>,
    pub rules: Vec<Rule>,
    pub special_events: Vec<SpecialEvent>,
    pub event_templates: Vec<EventTemplate>,
}

// ==========================================
// Orquestrador
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ScheduleOrchestrator {
    resolver: EventImpactResolver,
}

impl ScheduleOrchestrator {
    pub fn new() -> Self {
        Self {
            resolver: EventImpactResolver::new(),
        }
    }

    /// Partes necessárias da semana: programa padrão ajustado
    /// pelo evento especial, quando houver. É o que o colaborador
    /// externo de geração recebe como pauta a preencher.
    pub fn required_parts(
        &self,
        snapshot: &ScheduleSnapshot,
        week: &str,
    ) -> Result<Vec<PlannedPart>, EventError> {
        let mut parts = standard_weekly_parts();
        if let Some(event) = snapshot.special_events.iter().find(|e| e.week == week) {
            let template = snapshot
                .event_templates
                .iter()
                .find(|t| t.id == event.template_id)
                .ok_or_else(|| EventError::TemplateNotFound(event.template_id.clone()))?;
            parts = self.resolver.apply(event, template, parts)?;
        }
        Ok(parts)
    }

    /// Monta a proposta de uma semana de ponta a ponta.
    pub fn propose_week(
        &self,
        snapshot: &ScheduleSnapshot,
        week: &str,
    ) -> Result<WeekProposal, EventError> {
        info!(semana = %week, "iniciando proposta de pauta");

        // Etapa 1: data da reunião
        let meeting_date = calculate_part_date(week);

        // Etapa 2: partes necessárias (programa padrão + evento)
        let mut parts = standard_weekly_parts();
        let mut event_part_title: Option<(String, String)> = None;
        if let Some(event) = snapshot.special_events.iter().find(|e| e.week == week) {
            let template = snapshot
                .event_templates
                .iter()
                .find(|t| t.id == event.template_id)
                .ok_or_else(|| EventError::TemplateNotFound(event.template_id.clone()))?;
            let before = parts.len();
            parts = self.resolver.apply(event, template, parts)?;
            info!(
                semana = %week,
                modelo = %template.name,
                antes = before,
                depois = parts.len(),
                "pauta ajustada por evento especial"
            );
            // ReassignPart não sintetiza parte própria do evento
            if template.impact.action != crate::domain::types::EventImpactAction::ReassignPart
                && !event.assigned_to.trim().is_empty()
            {
                if let Some(part) = parts.last() {
                    event_part_title = Some((part.title.clone(), event.assigned_to.clone()));
                }
            }
        }

        // Etapa 3: motor de regras e histórico de rodízio
        let engine = RuleEngine::new(snapshot.rules.clone());
        let last_by_type = Self::last_assignment_index(&snapshot.participations);

        // Etapa 4: designação parte a parte
        let mut assigned_this_week: HashSet<String> = HashSet::new();
        let mut assignments = Vec::with_capacity(parts.len());
        for part in parts {
            let assignment = self.assign_part(
                snapshot,
                &engine,
                &last_by_type,
                &mut assigned_this_week,
                &part,
                meeting_date,
                event_part_title.as_ref(),
            );
            assignments.push(assignment);
        }

        let pending = assignments.iter().filter(|a| a.needs_attention).count();
        info!(
            semana = %week,
            partes = assignments.len(),
            pendentes = pending,
            "proposta de pauta concluída"
        );
        Ok(WeekProposal {
            week: week.to_string(),
            meeting_date,
            assignments,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn assign_part(
        &self,
        snapshot: &ScheduleSnapshot,
        engine: &RuleEngine,
        last_by_type: &HashMap<(String, ParticipationType), DateTime<Utc>>,
        assigned_this_week: &mut HashSet<String>,
        part: &PlannedPart,
        meeting_date: DateTime<Utc>,
        event_part: Option<&(String, String)>,
    ) -> ProposedAssignment {
        // Cânticos nunca recebem designado
        if part.part_type == ParticipationType::Cantico {
            return ProposedAssignment {
                part: part.clone(),
                assignee: None,
                helper: None,
                needs_attention: false,
                reasons: vec!["Cânticos não recebem designação.".to_string()],
            };
        }

        // Parte do próprio evento: designado vem do evento
        if let Some((title, assigned_to)) = event_part {
            if &part.title == title {
                assigned_this_week.insert(normalize_name(assigned_to));
                return ProposedAssignment {
                    part: part.clone(),
                    assignee: Some(assigned_to.clone()),
                    helper: None,
                    needs_attention: false,
                    reasons: vec!["Designado diretamente pelo evento especial.".to_string()],
                };
            }
        }

        let mut candidates =
            self.eligible_for(snapshot, engine, part, meeting_date, false);
        Self::rank(&mut candidates, part.part_type, last_by_type, assigned_this_week);

        let Some(assignee) = candidates.first().copied() else {
            debug!(parte = %part.title, "nenhum publicador elegível");
            return ProposedAssignment {
                part: part.clone(),
                assignee: None,
                helper: None,
                needs_attention: true,
                reasons: vec!["Nenhum publicador elegível para esta parte.".to_string()],
            };
        };

        let mut reasons = vec![Self::rotation_reason(assignee, part.part_type, last_by_type)];
        assigned_this_week.insert(normalize_name(&assignee.name));

        // Ajudante para partes do ministério
        let mut helper_name = None;
        let mut needs_attention = false;
        if part.part_type.requires_helper() {
            match self.pick_helper(
                snapshot,
                engine,
                last_by_type,
                assigned_this_week,
                assignee,
                meeting_date,
            ) {
                Some(helper) => {
                    assigned_this_week.insert(normalize_name(&helper.name));
                    reasons.push(format!("Ajudante: {}.", helper.name));
                    helper_name = Some(helper.name.clone());
                }
                None => {
                    needs_attention = true;
                    reasons.push("Nenhum ajudante elegível para esta parte.".to_string());
                }
            }
        }

        ProposedAssignment {
            part: part.clone(),
            assignee: Some(assignee.name.clone()),
            helper: helper_name,
            needs_attention,
            reasons,
        }
    }

    /// Elegíveis para uma parte: atuante, permitido na seção,
    /// disponível na data e não bloqueado por nenhuma regra
    /// ativa. Publicador não atuante fica fora mesmo com a
    /// regra semeada correspondente desligada ou excluída.
    fn eligible_for<'a>(
        &self,
        snapshot: &'a ScheduleSnapshot,
        engine: &RuleEngine,
        part: &PlannedPart,
        meeting_date: DateTime<Utc>,
        allow_helper_only: bool,
    ) -> Vec<&'a Publisher> {
        let date = meeting_date.date_naive();
        snapshot
            .publishers
            .iter()
            .filter(|p| p.is_serving)
            .filter(|p| allow_helper_only || !p.is_helper_only)
            .filter(|p| {
                part.part_type
                    .section()
                    .map(|s| p.privileges_by_section.allows(s))
                    .unwrap_or(true)
            })
            .filter(|p| p.availability.is_available_on(date))
            .filter(|p| {
                let facts = FactBag::for_candidate(p, part.part_type, &part.title);
                !engine.is_blocked(&facts)
            })
            .collect()
    }

    fn pick_helper<'a>(
        &self,
        snapshot: &'a ScheduleSnapshot,
        engine: &RuleEngine,
        last_by_type: &HashMap<(String, ParticipationType), DateTime<Utc>>,
        assigned_this_week: &HashSet<String>,
        assignee: &Publisher,
        meeting_date: DateTime<Utc>,
    ) -> Option<&'a Publisher> {
        let helper_part = PlannedPart::new("Ajudante", ParticipationType::Ajudante);
        let mut candidates: Vec<&Publisher> = self
            .eligible_for(snapshot, engine, &helper_part, meeting_date, true)
            .into_iter()
            .filter(|p| p.id != assignee.id)
            .filter(|p| validate_pairing(assignee, p).is_valid)
            .collect();
        Self::rank(
            &mut candidates,
            ParticipationType::Ajudante,
            last_by_type,
            assigned_this_week,
        );
        candidates.first().copied()
    }

    /// Rodízio: nunca designados primeiro, depois por data da
    /// última designação do mesmo tipo; quem ainda não recebeu
    /// parte nesta proposta tem preferência; empate por nome.
    fn rank(
        candidates: &mut [&Publisher],
        part_type: ParticipationType,
        last_by_type: &HashMap<(String, ParticipationType), DateTime<Utc>>,
        assigned_this_week: &HashSet<String>,
    ) {
        candidates.sort_by_key(|p| {
            let key = normalize_name(&p.name);
            let last = last_by_type.get(&(key.clone(), part_type)).copied();
            (assigned_this_week.contains(&key), last, p.name.clone())
        });
    }

    /// Data mais recente por (nome normalizado, tipo de parte).
    fn last_assignment_index(
        participations: &[Participation],
    ) -> HashMap<(String, ParticipationType), DateTime<Utc>> {
        let mut index: HashMap<(String, ParticipationType), DateTime<Utc>> = HashMap::new();
        for p in participations {
            let key = (normalize_name(&p.publisher_name), p.part_type);
            index
                .entry(key)
                .and_modify(|d| {
                    if p.date > *d {
                        *d = p.date;
                    }
                })
                .or_insert(p.date);
        }
        index
    }

    fn rotation_reason(
        publisher: &Publisher,
        part_type: ParticipationType,
        last_by_type: &HashMap<(String, ParticipationType), DateTime<Utc>>,
    ) -> String {
        match last_by_type.get(&(normalize_name(&publisher.name), part_type)) {
            Some(date) => format!(
                "Última designação de '{}' em {}.",
                part_type,
                date.format("%Y-%m-%d")
            ),
            None => format!("Sem designação anterior de '{}'.", part_type),
        }
    }
}
