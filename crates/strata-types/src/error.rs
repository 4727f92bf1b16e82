use thiserror::Error;

/// Errors produced while parsing caller-supplied query and list input.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("invalid order direction: {0:?} (expected \"asc\" or \"desc\")")]
    InvalidDirection(String),
}
