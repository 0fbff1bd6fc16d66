use crate::{
    configuration::Configuration,
    error::{MapperError, Result},
    params::ParamNameResolver,
    statement::MappedStatement,
};
use binding::{BoundTemplate, Statement};
use model::core::value::Value;
use std::sync::Arc;
use tracing::debug;

/// Entry point for preparing mapped statements against caller arguments.
///
/// A session is cheap to clone and holds no per-call state, so one session
/// can be shared by any number of threads.
#[derive(Clone)]
pub struct MapperSession {
    configuration: Arc<Configuration>,
}

impl MapperSession {
    pub fn new(configuration: Arc<Configuration>) -> Self {
        Self { configuration }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Combines positional call arguments into a single statement argument.
    pub fn arguments(&self, names: &[Option<&str>], values: Vec<Value>) -> Value {
        ParamNameResolver::new(names, self.configuration.settings().use_actual_param_name).named_params(values)
    }

    /// Final SQL and parameter list for one call, after interceptors have
    /// had their say. Nothing is bound.
    pub fn bound_template(&self, statement_id: &str, argument: &Value) -> Result<BoundTemplate> {
        let statement = self.configuration.statement(statement_id)?;
        self.render(&statement, argument)
    }

    fn render(&self, statement: &MappedStatement, argument: &Value) -> Result<BoundTemplate> {
        let config = &self.configuration;
        let bound = statement.bound_template(
            argument,
            config.settings().database_id.as_deref(),
            config.type_handlers(),
            config.type_aliases(),
        )?;
        let bound = config.interceptors().apply_render(statement, bound, argument)?;
        bound.validate().map_err(MapperError::binding(&statement.id))?;

        debug!("==>  Preparing: {}", bound.sql());
        Ok(bound)
    }

    /// Renders `statement_id` and binds every parameter into `stmt`.
    /// Returns the bound template so output parameters can be read back.
    pub fn prepare(&self, statement_id: &str, argument: &Value, stmt: &mut dyn Statement) -> Result<BoundTemplate> {
        let config = &self.configuration;
        let statement = config.statement(statement_id)?;
        let bound = self.render(&statement, argument)?;

        config.interceptors().apply_bind(&statement, &bound, argument)?;
        config
            .binder()
            .bind(stmt, &bound, argument)
            .map_err(MapperError::binding(&statement.id))?;

        debug!(
            "==> Parameters: {}",
            bound
                .parameters()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(bound)
    }

    /// Copies output parameters of an executed statement into `argument`.
    pub fn apply_outputs(
        &self,
        statement_id: &str,
        bound: &BoundTemplate,
        stmt: &dyn Statement,
        argument: &mut Value,
    ) -> Result<()> {
        self.configuration
            .binder()
            .apply_outputs(stmt, bound, argument)
            .map_err(MapperError::binding(statement_id))
    }
}
