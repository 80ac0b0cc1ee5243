// ==========================================
// Designações RVM - Resolvedor de impacto de eventos
// ==========================================
// Aplica o impacto de um evento especial (visita do
// superintendente, Memorial, etc.) sobre a lista de partes
// planejadas de uma semana, segundo o modelo do evento.
// A validação de instanciação falha apenas a operação
// corrente, nunca o lote.
// ==========================================

use crate::domain::event::{EventTemplate, SpecialEvent};
use crate::domain::schedule::PlannedPart;
use crate::domain::types::{EventImpactAction, ParticipationType};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Evento '{template}' exige tema, mas nenhum foi informado")]
    MissingTheme { template: String },
    #[error("Evento '{template}' exige designado, mas nenhum foi informado")]
    MissingAssignee { template: String },
    #[error("Modelo de evento não encontrado: {0}")]
    TemplateNotFound(String),
}

#[derive(Debug, Clone, Default)]
pub struct EventImpactResolver;

impl EventImpactResolver {
    pub fn new() -> Self {
        Self
    }

    /// Campos obrigatórios do modelo devem estar preenchidos
    /// (em branco ou só espaços conta como ausente).
    pub fn validate_instantiation(
        &self,
        event: &SpecialEvent,
        template: &EventTemplate,
    ) -> Result<(), EventError> {
        if template.defaults.requires_theme && event.theme.trim().is_empty() {
            return Err(EventError::MissingTheme {
                template: template.name.clone(),
            });
        }
        if template.defaults.requires_assignee && event.assigned_to.trim().is_empty() {
            return Err(EventError::MissingAssignee {
                template: template.name.clone(),
            });
        }
        Ok(())
    }

    /// Aplica o impacto do evento sobre as partes planejadas da
    /// semana, devolvendo a lista ajustada.
    pub fn apply(
        &self,
        event: &SpecialEvent,
        template: &EventTemplate,
        parts: Vec<PlannedPart>,
    ) -> Result<Vec<PlannedPart>, EventError> {
        self.validate_instantiation(event, template)?;

        let impact = &template.impact;
        let mut adjusted: Vec<PlannedPart> = match impact.action {
            EventImpactAction::ReplacePart | EventImpactAction::ReplaceSection => parts
                .into_iter()
                .filter(|p| !Self::is_target(impact.target_type.as_ref(), p.part_type))
                .collect(),
            EventImpactAction::AddPart => parts,
            EventImpactAction::ReassignPart => {
                let reassign = impact.reassign_target;
                parts
                    .into_iter()
                    .map(|mut p| {
                        if Self::is_target(impact.target_type.as_ref(), p.part_type) {
                            if let Some(target) = reassign {
                                p.part_type = target;
                            }
                        }
                        p
                    })
                    .collect()
            }
        };

        // ReassignPart só retarja; os demais ganham a parte do evento
        if impact.action != EventImpactAction::ReassignPart {
            adjusted.push(self.event_part(event, template));
        }

        // Redução de tempo opcional da configuração da instância
        if let Some(reduction) = &event.configuration.time_reduction {
            for part in adjusted.iter_mut() {
                if part.part_type == reduction.target_type {
                    if let Some(d) = part.duration {
                        part.duration = Some(d.saturating_sub(reduction.minutes));
                    }
                }
            }
        }

        debug!(
            semana = %event.week,
            modelo = %template.name,
            partes = adjusted.len(),
            "impacto de evento aplicado"
        );
        Ok(adjusted)
    }

    /// Parte sintetizada que representa o próprio evento na pauta.
    fn event_part(&self, event: &SpecialEvent, template: &EventTemplate) -> PlannedPart {
        let title = if !event.theme.trim().is_empty() {
            event.theme.clone()
        } else if let Some(theme) = &template.defaults.theme {
            theme.clone()
        } else {
            template.name.clone()
        };
        PlannedPart {
            title,
            part_type: ParticipationType::VidaCrista,
            duration: Some(event.duration),
        }
    }

    fn is_target(
        target: Option<&crate::domain::event::ImpactTarget>,
        part_type: ParticipationType,
    ) -> bool {
        target.map(|t| t.contains(part_type)).unwrap_or(false)
    }
}
