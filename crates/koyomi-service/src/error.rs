use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] koyomi_db::error::DbError),

    #[error("Parse error: {0}")]
    ParseError(#[from] koyomi_recur::ParseError),

    #[error(transparent)]
    CoreError(#[from] koyomi_core::error::CoreError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
