use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid conditions pattern for service '{service}': {source}")]
    InvalidPattern {
        service: String,
        #[source]
        source: regex::Error,
    },

    #[error("Notifier error: {0}")]
    NotifierError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
