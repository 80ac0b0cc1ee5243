// ==========================================
// Designações RVM - Biblioteca central
// ==========================================
// Designações na Reunião Vida e Ministério: motor de
// designações semanais com regras declaráveis, rodízio
// justo e eventos especiais. SQLite como armazenamento;
// a proposta de pauta é computação pura sobre fotografias.
// ==========================================

// ==========================================
// Declaração de módulos
// ==========================================

// Camada de domínio - entidades e tipos
pub mod domain;

// Camada de repositórios - acesso a dados
pub mod repository;

// Camada de motores - regras de negócio
pub mod engine;

// Infraestrutura de banco (abertura/PRAGMAs/esquema)
pub mod db;

// Sistema de logs
pub mod logging;

// Camada de API - operações de negócio
pub mod api;

// ==========================================
// Reexportação dos tipos centrais
// ==========================================

// Tipos de domínio
pub use domain::types::{
    AgeGroup, AvailabilityMode, Condition, EntityKind, EventImpactAction, Gender, MeetingSection,
    ParticipationType, RuleOperator,
};

// Entidades de domínio
pub use domain::{
    AiScheduleResult, EventTemplate, HistoryBackupItem, MeetingData, Participation, PlannedPart,
    ProposedAssignment, Publisher, Rule, SpecialEvent, WeekProposal, Workbook,
};

// Motores
pub use engine::{
    calculate_part_date, generate_weeks_for_workbook, infer_participation_type, normalize_name,
    parse_week_date, standardize_week_date, validate_pairing, CandidateGenerator,
    EventImpactResolver, RuleEngine, ScheduleOrchestrator, ScheduleSnapshot,
};

// API
pub use api::{ApiError, ApiResult, BackupApi, BackupDocument, SchedulingApi};

// ==========================================
// Constantes do sistema
// ==========================================

/// Versão do sistema
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nome do sistema
pub const APP_NAME: &str = "Designações RVM";
