use filter_compiler::CompileError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to deserialize input as JSON: {0}")]
    JsonDeserialize(#[from] serde_json::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Failed to compile the filter tree: {0}")]
    Compile(#[from] CompileError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid filter tree: {0}")]
    InvalidTree(String),

    #[error("Filter tree failed validation with {0} error(s)")]
    ValidationFailed(usize),
}
