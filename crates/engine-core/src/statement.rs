use crate::error::{MapperError, Result};
use binding::{BoundTemplate, PlaceholderResolver, TypeAliasRegistry, TypeHandlerRegistry};
use model::core::{data_type::DataType, value::Value};
use serde::Deserialize;
use std::{collections::HashMap, fmt, str::FromStr};
use template::{RenderedSql, RenderingContext, TemplateNode, render_with};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlCommand {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for SqlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SqlCommand::Select => "SELECT",
            SqlCommand::Insert => "INSERT",
            SqlCommand::Update => "UPDATE",
            SqlCommand::Delete => "DELETE",
        };
        write!(f, "{name}")
    }
}

impl FromStr for SqlCommand {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "select" => Ok(SqlCommand::Select),
            "insert" => Ok(SqlCommand::Insert),
            "update" => Ok(SqlCommand::Update),
            "delete" => Ok(SqlCommand::Delete),
            other => Err(format!("unknown statement kind '{other}'")),
        }
    }
}

/// Where a statement's SQL comes from on each call.
#[derive(Debug, Clone)]
pub enum SqlSource {
    /// No conditional, loop or bind nodes: resolved once at load time.
    Static(BoundTemplate),
    /// Re-rendered and re-resolved for every argument.
    Dynamic(TemplateNode),
}

impl SqlSource {
    pub fn new(
        statement_id: &str,
        tree: TemplateNode,
        parameter_type: Option<&DataType>,
        handlers: &TypeHandlerRegistry,
        aliases: &TypeAliasRegistry,
    ) -> Result<Self> {
        if tree.is_dynamic() {
            return Ok(SqlSource::Dynamic(tree));
        }

        let argument = Value::Null;
        let rendered = render_with(&tree, RenderingContext::new(&argument))
            .map_err(MapperError::template(statement_id))?;
        let argument_type = parameter_type.cloned().unwrap_or(DataType::Any);
        let bound = PlaceholderResolver::new(handlers, aliases)
            .resolve(&rendered.sql, &argument_type, &HashMap::new())
            .map_err(MapperError::binding(statement_id))?;
        Ok(SqlSource::Static(bound))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, SqlSource::Dynamic(_))
    }
}

/// A statement registered under a fully qualified id (`namespace.id`).
#[derive(Debug, Clone)]
pub struct MappedStatement {
    pub id: String,
    pub command: SqlCommand,
    pub parameter_type: Option<DataType>,
    pub database_id: Option<String>,
    pub source: SqlSource,
}

impl MappedStatement {
    pub fn short_id(&self) -> &str {
        self.id.rsplit('.').next().unwrap_or(&self.id)
    }

    /// Produces the bound template for one call.
    pub fn bound_template(
        &self,
        argument: &Value,
        database_id: Option<&str>,
        handlers: &TypeHandlerRegistry,
        aliases: &TypeAliasRegistry,
    ) -> Result<BoundTemplate> {
        match &self.source {
            SqlSource::Static(bound) => {
                trace!("Reusing static SQL for '{}'", self.id);
                Ok(bound.clone())
            }
            SqlSource::Dynamic(tree) => {
                let ctx = RenderingContext::new(argument).with_database_id(database_id);
                let RenderedSql { sql, bindings } =
                    render_with(tree, ctx).map_err(MapperError::template(&self.id))?;
                let argument_type = self
                    .parameter_type
                    .clone()
                    .unwrap_or_else(|| argument.data_type());
                let bound = PlaceholderResolver::new(handlers, aliases)
                    .resolve(&sql, &argument_type, &bindings)
                    .map_err(MapperError::binding(&self.id))?;
                Ok(bound.with_bindings(bindings))
            }
        }
    }
}
