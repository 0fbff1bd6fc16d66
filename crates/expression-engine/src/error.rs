use model::ModelError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Syntax error in expression '{expression}': {message}")]
    Syntax { expression: String, message: String },

    #[error("Unresolved name '{0}'")]
    UnresolvedName(String),

    #[error("Cannot read '{property}' from a null value")]
    NullTarget { property: String },

    #[error(transparent)]
    Property(#[from] ModelError),

    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Invalid arguments for {method}: {message}")]
    InvalidMethodArgs { method: String, message: String },

    #[error("Operator '{op}' cannot be applied to {left} and {right}")]
    TypeMismatch {
        op: String,
        left: String,
        right: String,
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Arithmetic overflow in '{0}'")]
    Overflow(String),

    #[error("The expression '{0}' evaluated to a null value")]
    NullCollection(String),

    #[error("The expression '{expression}' evaluated to {type_name}, which is not iterable")]
    NotIterable {
        expression: String,
        type_name: String,
    },
}

impl ExpressionError {
    /// Syntax errors are configuration problems; everything else happens at
    /// evaluation time.
    pub fn is_syntax(&self) -> bool {
        matches!(self, ExpressionError::Syntax { .. })
    }

    pub fn is_iteration(&self) -> bool {
        matches!(
            self,
            ExpressionError::NullCollection(_) | ExpressionError::NotIterable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ExpressionError>;
