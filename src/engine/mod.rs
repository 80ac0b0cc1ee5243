// ==========================================
// Designações RVM - Camada de motores
// ==========================================
// Lógica pura de decisão: normalização, regras,
// pareamento, eventos e o agendador. Nenhum módulo
// daqui toca o banco de dados.
// ==========================================

pub mod events;
pub mod generator;
pub mod infer;
pub mod name;
pub mod pairing;
pub mod repair;
pub mod rules;
pub mod scheduler;
pub mod week;

pub use events::{EventError, EventImpactResolver};
pub use generator::{CandidateGenerator, sanitize_results};
pub use infer::infer_participation_type;
pub use name::normalize_name;
pub use pairing::{PairingCheck, validate_pairing};
pub use repair::{repair_participation, repair_participations};
pub use rules::{FactBag, RuleEngine};
pub use scheduler::{ScheduleOrchestrator, ScheduleSnapshot, standard_weekly_parts};
pub use week::{
    calculate_part_date, generate_weeks_for_workbook, parse_week_date, standardize_week_date,
};
