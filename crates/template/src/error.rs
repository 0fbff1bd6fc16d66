use expression_engine::ExpressionError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Invalid expression '{expression}': {source}")]
    InvalidExpression {
        expression: String,
        #[source]
        source: ExpressionError,
    },

    #[error("Too many default (otherwise) elements in choose statement")]
    MultipleOtherwise,

    #[error("Unknown element <{0}> in SQL statement")]
    UnknownElement(String),

    #[error("Missing required attribute '{attribute}' on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    #[error("Unknown SQL fragment '{0}'")]
    UnknownFragment(String),

    #[error("Circular include of SQL fragment '{0}'")]
    CircularInclude(String),

    #[error("Error evaluating expression '{expression}': {source}")]
    Evaluation {
        expression: String,
        #[source]
        source: ExpressionError,
    },

    #[error("Invalid loop collection '{expression}': {source}")]
    Collection {
        expression: String,
        #[source]
        source: ExpressionError,
    },
}

impl TemplateError {
    /// Raised while building a tree rather than while rendering one.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            TemplateError::Evaluation { .. } | TemplateError::Collection { .. }
        )
    }

    pub fn is_binding(&self) -> bool {
        matches!(self, TemplateError::Collection { .. })
    }

    /// The expression or element the error is about.
    pub fn token(&self) -> Option<&str> {
        match self {
            TemplateError::InvalidExpression { expression, .. }
            | TemplateError::Evaluation { expression, .. }
            | TemplateError::Collection { expression, .. } => Some(expression),
            TemplateError::UnknownElement(name)
            | TemplateError::UnknownFragment(name)
            | TemplateError::CircularInclude(name) => Some(name),
            TemplateError::MissingAttribute { element, .. } => Some(element),
            TemplateError::MultipleOtherwise => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
