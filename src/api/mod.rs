// ==========================================
// Designações RVM - Camada de API
// ==========================================
// Operações de negócio que ligam motores a repositórios:
// geração e confirmação de pauta, importação histórica,
// exportação/importação de backup.
// ==========================================

pub mod backup;
pub mod error;
pub mod scheduling;

pub use backup::{BackupApi, BackupDocument};
pub use error::{ApiError, ApiResult};
pub use scheduling::{HistoricalRow, SchedulingApi};
