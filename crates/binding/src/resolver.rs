use crate::{
    bound::{BoundTemplate, MARKER},
    descriptor::{ParameterDescriptor, ParameterMode},
    error::{BindingError, Result},
    expression::ParameterExpression,
    types::{TypeAliasRegistry, TypeHandlerRegistry},
};
use model::{
    core::{data_type::DataType, sql_type::SqlType, value::Value},
    meta::{PropertyPath, property_type, value_type_in},
};
use std::collections::HashMap;
use template::PLACEHOLDER_TOKENS;
use tracing::{debug, trace};

const VALID_ATTRIBUTES: &str = "javaType, jdbcType, mode, numericScale, resultMap, typeHandler, jdbcTypeName";

/// Replaces `#{...}` placeholders with positional markers and describes each
/// parameter, in the order the markers appear.
pub struct PlaceholderResolver<'a> {
    handlers: &'a TypeHandlerRegistry,
    aliases: &'a TypeAliasRegistry,
}

impl<'a> PlaceholderResolver<'a> {
    pub fn new(handlers: &'a TypeHandlerRegistry, aliases: &'a TypeAliasRegistry) -> Self {
        Self { handlers, aliases }
    }

    /// `argument_type` is the declared type of the statement's argument;
    /// `bindings` are values bound while rendering and take precedence.
    pub fn resolve(
        &self,
        sql: &str,
        argument_type: &DataType,
        bindings: &HashMap<String, Value>,
    ) -> Result<BoundTemplate> {
        let mut markers = Vec::new();
        let mut parameters = Vec::new();

        let sql = PLACEHOLDER_TOKENS.parse(sql, |body, offset| {
            parameters.push(self.build_descriptor(body, argument_type, bindings)?);
            markers.push(offset);
            Ok::<_, BindingError>(MARKER.to_string())
        })?;

        debug!("Resolved {} parameters: {}", parameters.len(), sql);
        let bound = BoundTemplate::from_parts(sql, markers, parameters);
        bound.validate()?;
        Ok(bound)
    }

    fn build_descriptor(
        &self,
        body: &str,
        argument_type: &DataType,
        bindings: &HashMap<String, Value>,
    ) -> Result<ParameterDescriptor> {
        let expression = ParameterExpression::parse(body)?;
        let sql_type = expression
            .attribute("jdbcType")
            .map(str::parse::<SqlType>)
            .transpose()?;

        let inferred = self.infer_type(&expression.property, argument_type, bindings, sql_type);
        let mut descriptor = ParameterDescriptor::new(&expression.property, inferred);
        let mut handler_alias = None;

        for (name, value) in &expression.attributes {
            match name.as_str() {
                "javaType" => descriptor.data_type = self.aliases.resolve(value)?,
                "jdbcType" => descriptor.sql_type = sql_type,
                "mode" => descriptor.mode = value.parse::<ParameterMode>()?,
                "numericScale" => {
                    descriptor.numeric_scale =
                        Some(value.parse().map_err(|_| BindingError::InvalidParameter {
                            expression: body.to_string(),
                            message: format!("numericScale '{value}' is not a number"),
                        })?)
                }
                "resultMap" => descriptor.result_map_id = Some(value.clone()),
                "typeHandler" => handler_alias = Some(value.as_str()),
                "jdbcTypeName" => descriptor.sql_type_name = Some(value.clone()),
                "property" => {}
                "expression" => {
                    return Err(BindingError::InvalidParameter {
                        expression: body.to_string(),
                        message: "expression based parameters are not supported".to_string(),
                    });
                }
                other => {
                    return Err(BindingError::UnknownAttribute {
                        attribute: other.to_string(),
                        expression: body.to_string(),
                        valid: VALID_ATTRIBUTES,
                    });
                }
            }
        }

        if let Some(alias) = handler_alias {
            let handler = self
                .handlers
                .named(alias)
                .ok_or_else(|| BindingError::UnknownTypeHandler(alias.to_string()))?;
            descriptor.type_handler = Some(handler);
        }

        trace!("Parameter {} resolved as {:?}", descriptor, descriptor.data_type);
        Ok(descriptor)
    }

    /// Best static type for `property`. Never fails: anything that cannot be
    /// determined now is `Any` and gets sorted out when binding.
    fn infer_type(
        &self,
        property: &str,
        argument_type: &DataType,
        bindings: &HashMap<String, Value>,
        sql_type: Option<SqlType>,
    ) -> DataType {
        let Ok(path) = PropertyPath::parse(property) else {
            return DataType::Any;
        };

        if let Some(data_type) = value_type_in(bindings, &path) {
            return data_type;
        }
        if self.handlers.has_direct_converter(argument_type) {
            return argument_type.clone();
        }
        if sql_type == Some(SqlType::Cursor) {
            return DataType::Cursor;
        }
        if matches!(argument_type, DataType::Map | DataType::Any) {
            return DataType::Any;
        }
        property_type(argument_type, &path).unwrap_or_else(|| {
            debug!("No type for '{}' in {}, deferring to bind time", property, argument_type);
            DataType::Any
        })
    }
}
