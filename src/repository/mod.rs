// ==========================================
// Designações RVM - Camada de repositórios
// ==========================================
// Acesso a dados via rusqlite, sem lógica de negócio.
// Consultas sempre parametrizadas; a conexão é
// compartilhada por Arc<Mutex<_>>.
// ==========================================

pub mod error;
pub mod event_repo;
pub mod history_repo;
pub mod participation_repo;
pub mod publisher_repo;
pub mod rule_repo;
pub mod seed;
pub mod workbook_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use event_repo::{EventTemplateRepository, SpecialEventRepository};
pub use history_repo::HistoryBackupRepository;
pub use participation_repo::ParticipationRepository;
pub use publisher_repo::PublisherRepository;
pub use rule_repo::RuleRepository;
pub use seed::{seed_defaults, SeedReport};
pub use workbook_repo::WorkbookRepository;
