use engine_core::MapperError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse statement argument as JSON: {0}")]
    ParamsParse(#[from] serde_json::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Invalid dialect provided: {0}")]
    InvalidDialect(String),

    #[error(transparent)]
    Mapper(#[from] MapperError),
}
