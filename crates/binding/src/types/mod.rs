pub(crate) mod coercion;
pub mod alias;
pub mod handler;
pub mod registry;

pub use alias::TypeAliasRegistry;
pub use handler::{CoercingHandler, ObjectHandler, TypeHandler};
pub use registry::TypeHandlerRegistry;
