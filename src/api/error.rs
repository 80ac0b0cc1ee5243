// ==========================================
// Designações RVM - Erros da camada de API
// ==========================================
// Toda falha visível ao usuário vira uma mensagem única e
// descritiva. RuleBlocked não é erro: é resultado esperado
// da filtragem e nunca aparece aqui.
// ==========================================

use crate::engine::events::EventError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("Registro não encontrado: {0}")]
    NotFound(String),

    #[error("Falha de validação do evento: {0}")]
    Event(#[from] EventError),

    #[error("Falha de acesso a dados: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Falha do colaborador externo: {0}")]
    Collaborator(String),

    #[error("Documento de backup inválido: {0}")]
    InvalidBackupDocument(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
