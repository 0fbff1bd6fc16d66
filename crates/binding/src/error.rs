use model::{ModelError, core::sql_type::SqlType};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BindingError {
    #[error("Parsing error in '{expression}': {message}")]
    InvalidParameter { expression: String, message: String },

    #[error(
        "An invalid property '{attribute}' was found in mapping #{{{expression}}}. Valid properties are {valid}"
    )]
    UnknownAttribute {
        attribute: String,
        expression: String,
        valid: &'static str,
    },

    #[error("Unknown type handler '{0}'")]
    UnknownTypeHandler(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("SQL has {markers} parameter markers but {parameters} parameters were resolved")]
    MarkerMismatch { markers: usize, parameters: usize },

    #[error("Could not read parameter '{property}': {source}")]
    Property {
        property: String,
        #[source]
        source: ModelError,
    },

    #[error("Could not set parameter #{ordinal} ('{property}') with type handler {handler}: {message}")]
    Conversion {
        property: String,
        ordinal: usize,
        handler: String,
        message: String,
    },

    #[error("A SQL type must be specified for null parameter #{ordinal}")]
    UntypedNull { ordinal: usize },

    #[error("Statement rejected parameter #{ordinal}: {message}")]
    Statement { ordinal: usize, message: String },

    #[error("No output value for parameter #{ordinal} of type {sql_type:?}")]
    MissingOutput { ordinal: usize, sql_type: Option<SqlType> },
}

impl BindingError {
    /// Raised while resolving placeholders, i.e. from mapper configuration,
    /// rather than while binding values.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            BindingError::InvalidParameter { .. }
                | BindingError::UnknownAttribute { .. }
                | BindingError::UnknownTypeHandler(_)
                | BindingError::Model(_)
        )
    }

    /// Adds the failing parameter's identity to a converter error.
    pub(crate) fn for_parameter(self, property: &str, ordinal: usize, handler: &str) -> Self {
        match self {
            BindingError::Conversion { message, .. } => BindingError::Conversion {
                property: property.to_string(),
                ordinal,
                handler: handler.to_string(),
                message,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, BindingError>;
