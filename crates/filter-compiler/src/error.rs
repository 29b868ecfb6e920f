use thiserror::Error;

/// Errors raised while compiling a filter tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// AND-distribution would produce more clauses than the configured limit.
    #[error("filter expands to {attempted} clauses, exceeding the limit of {limit}")]
    ClauseLimitExceeded { limit: usize, attempted: usize },

    #[error("invalid compiler settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, CompileError>;
