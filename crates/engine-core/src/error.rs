use binding::BindingError;
use template::TemplateError;
use thiserror::Error;

/// How a failure should be treated by whoever called into the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad mapper content: fix the mapper, retrying will not help.
    Configuration,
    /// An expression failed against this particular argument.
    Evaluation,
    /// A value could not be bound for this particular call.
    Binding,
}

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("Error building SQL for statement '{statement}': {source}")]
    Template {
        statement: String,
        #[source]
        source: TemplateError,
    },

    #[error("Error binding parameters for statement '{statement}': {source}")]
    Binding {
        statement: String,
        #[source]
        source: BindingError,
    },

    #[error("Mapped statements collection does not contain value for '{0}'")]
    UnknownStatement(String),

    #[error("Statement id '{0}' is ambiguous; use the fully qualified id")]
    AmbiguousStatement(String),

    #[error("Mapped statement '{0}' is already registered")]
    DuplicateStatement(String),

    #[error("Invalid mapper document '{source_name}': {message}")]
    Document { source_name: String, message: String },

    #[error("Interceptor '{interceptor}' rejected statement '{statement}': {message}")]
    Interceptor {
        interceptor: String,
        statement: String,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapperError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MapperError::Template { source, .. } if source.is_binding() => ErrorKind::Binding,
            MapperError::Template { source, .. } if source.is_configuration() => ErrorKind::Configuration,
            MapperError::Template { .. } => ErrorKind::Evaluation,
            MapperError::Binding { source, .. } if source.is_configuration() => ErrorKind::Configuration,
            MapperError::Binding { .. } | MapperError::Interceptor { .. } => ErrorKind::Binding,
            MapperError::UnknownStatement(_)
            | MapperError::AmbiguousStatement(_)
            | MapperError::DuplicateStatement(_)
            | MapperError::Document { .. }
            | MapperError::Io(_) => ErrorKind::Configuration,
        }
    }

    /// The mapped statement the failure belongs to, when known.
    pub fn statement_id(&self) -> Option<&str> {
        match self {
            MapperError::Template { statement, .. }
            | MapperError::Binding { statement, .. }
            | MapperError::Interceptor { statement, .. } => Some(statement),
            MapperError::UnknownStatement(id)
            | MapperError::AmbiguousStatement(id)
            | MapperError::DuplicateStatement(id) => Some(id),
            MapperError::Document { .. } | MapperError::Io(_) => None,
        }
    }

    pub(crate) fn template(statement: &str) -> impl FnOnce(TemplateError) -> MapperError + '_ {
        move |source| MapperError::Template {
            statement: statement.to_string(),
            source,
        }
    }

    pub(crate) fn binding(statement: &str) -> impl FnOnce(BindingError) -> MapperError + '_ {
        move |source| MapperError::Binding {
            statement: statement.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MapperError>;
