use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),

    #[error("unknown filter operator: {0}")]
    UnknownOperator(String),
}
