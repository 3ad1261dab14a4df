use thiserror::Error;

use crate::models::VenueId;

/// Типизированные ошибки движка. Ни одна из них не фатальна для процесса:
/// вызывающий слой сообщает оператору и позволяет повторить операцию.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("venue {to} is unreachable from venue {from}")]
    Unreachable { from: VenueId, to: VenueId },
}

impl EngineError {
    pub fn not_found(what: impl Into<String>) -> Self {
        EngineError::NotFound(what.into())
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        EngineError::InvalidInput(reason.into())
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        EngineError::Conflict(reason.into())
    }

    pub fn capacity(what: impl Into<String>) -> Self {
        EngineError::CapacityExceeded(what.into())
    }
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        EngineError::InvalidInput(errors.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
