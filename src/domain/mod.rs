// ==========================================
// Designações RVM - Camada de domínio
// ==========================================
// Entidades, tipos e regras de formato.
// Não contém acesso a dados nem lógica de motor.
// ==========================================

pub mod event;
pub mod participation;
pub mod publisher;
pub mod rule;
pub mod schedule;
pub mod types;
pub mod workbook;

// Reexportação dos tipos centrais
pub use event::{
    EventConfiguration, EventDefaults, EventImpact, EventTemplate, ImpactTarget, SpecialEvent,
    TimeReduction, initial_event_templates,
};
pub use participation::{HistoryBackupItem, Participation};
pub use publisher::{Availability, Publisher, PublisherPrivileges, SectionPermissions};
pub use rule::{FactValue, Rule, RuleCondition, initial_rules};
pub use schedule::{AiScheduleResult, MeetingData, PlannedPart, ProposedAssignment, WeekProposal};
pub use types::{
    AgeGroup, AvailabilityMode, Condition, EntityKind, EventImpactAction, Gender, MeetingSection,
    ParticipationType, RuleOperator,
};
pub use workbook::Workbook;
