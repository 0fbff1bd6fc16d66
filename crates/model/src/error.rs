use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("There is no property named '{property}' in '{type_name}'")]
    NoSuchProperty { property: String, type_name: String },

    #[error("Cannot navigate '{segment}' of path '{path}': value of type {type_name} has no properties")]
    NotNavigable {
        path: String,
        segment: String,
        type_name: String,
    },

    #[error("Index {index} out of bounds for path '{path}' (length {len})")]
    IndexOutOfBounds {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("Invalid index '{index}' in path '{path}'")]
    InvalidIndex { path: String, index: String },

    #[error("Invalid property path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    #[error("Record '{type_name}' has {expected} fields but {actual} values were given")]
    FieldCountMismatch {
        type_name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown SQL type: {0}")]
    UnknownSqlType(String),

    #[error("Unknown type alias: {0}")]
    UnknownTypeAlias(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
