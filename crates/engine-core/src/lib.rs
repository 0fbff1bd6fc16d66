pub mod configuration;
pub mod error;
pub mod loader;
pub mod params;
pub mod plugin;
pub mod session;
pub mod settings;
pub mod statement;

pub use configuration::{Configuration, ConfigurationBuilder};
pub use error::{ErrorKind, MapperError, Result};
pub use loader::{MapperDocument, StatementDefinition, load_configuration};
pub use params::{ParamNameResolver, wrap_collection};
pub use plugin::{Interceptor, InterceptorChain};
pub use session::MapperSession;
pub use settings::Settings;
pub use statement::{MappedStatement, SqlCommand, SqlSource};
