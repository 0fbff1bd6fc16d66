pub mod binder;
pub mod bound;
pub mod descriptor;
pub mod dialect;
pub mod error;
pub mod expression;
pub mod resolver;
pub mod statement;
pub mod types;

pub use binder::ParameterBinder;
pub use bound::{BoundTemplate, MARKER};
pub use descriptor::{ParameterDescriptor, ParameterMode};
pub use dialect::{Dialect, DialectKind, MySql, Postgres};
pub use error::{BindingError, Result};
pub use expression::ParameterExpression;
pub use resolver::PlaceholderResolver;
pub use statement::{BoundParam, OutParam, ParamStore, Statement};
pub use types::{TypeAliasRegistry, TypeHandler, TypeHandlerRegistry};
