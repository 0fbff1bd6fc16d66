use crate::error::{BindingError, Result};
use model::core::{sql_type::SqlType, value::Value};
use std::collections::BTreeMap;

/// The outgoing prepared statement parameters are written into. Ordinals are
/// 1-based, matching marker positions in the SQL.
pub trait Statement {
    fn set_value(&mut self, ordinal: usize, value: Value, sql_type: Option<SqlType>) -> Result<()>;

    fn set_null(&mut self, ordinal: usize, sql_type: SqlType) -> Result<()>;

    fn register_out_parameter(
        &mut self,
        ordinal: usize,
        sql_type: SqlType,
        numeric_scale: Option<u32>,
        type_name: Option<&str>,
    ) -> Result<()>;

    /// Value of an output parameter after execution.
    fn output(&self, ordinal: usize) -> Option<Value>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    pub value: Value,
    pub sql_type: Option<SqlType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutParam {
    pub sql_type: SqlType,
    pub numeric_scale: Option<u32>,
    pub type_name: Option<String>,
}

/// In-memory statement that records what was bound, in ordinal order.
#[derive(Debug, Default, Clone)]
pub struct ParamStore {
    pub params: BTreeMap<usize, BoundParam>,
    pub outputs: BTreeMap<usize, OutParam>,
    results: BTreeMap<usize, Value>,
}

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound values in ordinal order.
    pub fn values(&self) -> Vec<Value> {
        self.params.values().map(|param| param.value.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Supplies the value an output parameter would have after execution.
    pub fn set_result(&mut self, ordinal: usize, value: Value) {
        self.results.insert(ordinal, value);
    }

    fn check_ordinal(ordinal: usize) -> Result<()> {
        if ordinal == 0 {
            return Err(BindingError::Statement {
                ordinal,
                message: "parameter ordinals start at 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Statement for ParamStore {
    fn set_value(&mut self, ordinal: usize, value: Value, sql_type: Option<SqlType>) -> Result<()> {
        Self::check_ordinal(ordinal)?;
        self.params.insert(ordinal, BoundParam { value, sql_type });
        Ok(())
    }

    fn set_null(&mut self, ordinal: usize, sql_type: SqlType) -> Result<()> {
        self.set_value(ordinal, Value::Null, Some(sql_type))
    }

    fn register_out_parameter(
        &mut self,
        ordinal: usize,
        sql_type: SqlType,
        numeric_scale: Option<u32>,
        type_name: Option<&str>,
    ) -> Result<()> {
        Self::check_ordinal(ordinal)?;
        self.outputs.insert(
            ordinal,
            OutParam {
                sql_type,
                numeric_scale,
                type_name: type_name.map(str::to_string),
            },
        );
        Ok(())
    }

    fn output(&self, ordinal: usize) -> Option<Value> {
        self.results.get(&ordinal).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_come_back_in_ordinal_order() {
        let mut store = ParamStore::new();
        store.set_value(2, Value::from("x"), None).unwrap();
        store.set_value(1, Value::Int(7), Some(SqlType::Integer)).unwrap();
        store.set_null(3, SqlType::Other).unwrap();

        assert_eq!(store.values(), vec![Value::Int(7), Value::from("x"), Value::Null]);
        assert_eq!(store.params[&3].sql_type, Some(SqlType::Other));
    }

    #[test]
    fn test_zero_ordinal_is_rejected() {
        let mut store = ParamStore::new();
        assert!(store.set_value(0, Value::Int(1), None).is_err());
        assert!(store.is_empty());
    }
}
