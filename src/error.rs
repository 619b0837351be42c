use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not found")]
    NotFound,

    #[error("{0} already exists")]
    DuplicateKey(String),

    #[error("invalid username or password")]
    AuthFailure,

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("session expired")]
    SessionExpired,

    #[error("forbidden")]
    Forbidden,

    #[error("export failed: {0}")]
    Export(String),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
