use crate::{
    error::{BindingError, Result},
    statement::Statement,
    types::coercion::coerce_value,
};
use model::core::{data_type::DataType, sql_type::SqlType, value::Value};
use std::fmt;

/// Converts values between the argument model and statement parameters.
pub trait TypeHandler: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Writes a non-null value at `ordinal`.
    fn set_non_null(
        &self,
        stmt: &mut dyn Statement,
        ordinal: usize,
        value: Value,
        sql_type: Option<SqlType>,
    ) -> Result<()>;

    /// Writes `value`; null requires a SQL type.
    fn set_parameter(
        &self,
        stmt: &mut dyn Statement,
        ordinal: usize,
        value: Value,
        sql_type: Option<SqlType>,
    ) -> Result<()> {
        if value.is_null() {
            let sql_type = sql_type.ok_or(BindingError::UntypedNull { ordinal })?;
            return stmt.set_null(ordinal, sql_type);
        }
        self.set_non_null(stmt, ordinal, value, sql_type)
    }

    /// Converts a value read back from an output parameter.
    fn get_result(&self, value: Value) -> Result<Value> {
        Ok(value)
    }

    /// Whether this handler only passes values through without knowing the
    /// target type.
    fn is_generic(&self) -> bool {
        false
    }
}

/// Handler that coerces every value to one target type before writing it.
#[derive(Debug, Clone)]
pub struct CoercingHandler {
    name: String,
    target: DataType,
}

impl CoercingHandler {
    pub fn new(target: DataType) -> Self {
        Self {
            name: format!("{}Handler", target.name()),
            target,
        }
    }

    pub fn target(&self) -> &DataType {
        &self.target
    }

    fn coerce(&self, ordinal: usize, value: Value) -> Result<Value> {
        coerce_value(value, &self.target).map_err(|message| BindingError::Conversion {
            property: String::new(),
            ordinal,
            handler: self.name.clone(),
            message,
        })
    }
}

impl TypeHandler for CoercingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_non_null(
        &self,
        stmt: &mut dyn Statement,
        ordinal: usize,
        value: Value,
        sql_type: Option<SqlType>,
    ) -> Result<()> {
        let value = self.coerce(ordinal, value)?;
        stmt.set_value(ordinal, value, sql_type)
    }

    fn get_result(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(value);
        }
        self.coerce(0, value)
    }
}

/// Writes values as they are. Used when nothing more specific is known.
#[derive(Debug, Clone, Default)]
pub struct ObjectHandler;

impl TypeHandler for ObjectHandler {
    fn name(&self) -> &str {
        "ObjectHandler"
    }

    fn set_non_null(
        &self,
        stmt: &mut dyn Statement,
        ordinal: usize,
        value: Value,
        sql_type: Option<SqlType>,
    ) -> Result<()> {
        stmt.set_value(ordinal, value, sql_type)
    }

    fn is_generic(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::ParamStore;

    #[test]
    fn test_coercing_handler_converts_before_writing() {
        let handler = CoercingHandler::new(DataType::Int32);
        let mut stmt = ParamStore::new();
        handler
            .set_parameter(&mut stmt, 1, Value::Int(42), Some(SqlType::Integer))
            .unwrap();
        assert_eq!(stmt.values(), vec![Value::Int32(42)]);
        assert_eq!(handler.name(), "intHandler");
    }

    #[test]
    fn test_conversion_failure_names_handler() {
        let handler = CoercingHandler::new(DataType::Int);
        let mut stmt = ParamStore::new();
        let err = handler
            .set_parameter(&mut stmt, 2, Value::from("x"), None)
            .unwrap_err();
        assert!(matches!(err, BindingError::Conversion { ordinal: 2, .. }));
        assert!(stmt.is_empty());
    }

    #[test]
    fn test_null_needs_sql_type() {
        let mut stmt = ParamStore::new();
        assert_eq!(
            ObjectHandler.set_parameter(&mut stmt, 1, Value::Null, None),
            Err(BindingError::UntypedNull { ordinal: 1 })
        );
        ObjectHandler
            .set_parameter(&mut stmt, 1, Value::Null, Some(SqlType::VarChar))
            .unwrap();
        assert_eq!(stmt.params[&1].sql_type, Some(SqlType::VarChar));
    }
}
