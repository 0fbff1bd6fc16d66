use binding::{BoundTemplate, ParameterDescriptor};
use engine_core::{Interceptor, MappedStatement, SqlCommand};
use model::core::{data_type::DataType, value::Value};
use std::sync::Mutex;

/// Appends `LIMIT ? OFFSET ?` to selects whose argument carries a `limit`.
pub struct Pagination;

impl Interceptor for Pagination {
    fn name(&self) -> &str {
        "pagination"
    }

    fn on_render(
        &self,
        statement: &MappedStatement,
        mut bound: BoundTemplate,
        argument: &Value,
    ) -> Result<BoundTemplate, String> {
        let Value::Map(map) = argument else {
            return Ok(bound);
        };
        if statement.command != SqlCommand::Select || !map.contains_key("limit") {
            return Ok(bound);
        }

        bound.push_sql(" LIMIT ");
        bound.push_parameter(ParameterDescriptor::new("limit", DataType::Int));
        bound.push_sql(" OFFSET ");
        match map.get("offset") {
            Some(_) => bound.push_parameter(ParameterDescriptor::new("offset", DataType::Int)),
            None => {
                bound.bind_value("__offset", Value::Int(0));
                bound.push_parameter(ParameterDescriptor::new("__offset", DataType::Int));
            }
        }
        Ok(bound)
    }
}

/// Refuses to run deletes.
pub struct ReadOnly;

impl Interceptor for ReadOnly {
    fn name(&self) -> &str {
        "read-only"
    }

    fn on_bind(&self, statement: &MappedStatement, _bound: &BoundTemplate, _argument: &Value) -> Result<(), String> {
        match statement.command {
            SqlCommand::Delete => Err("deletes are disabled".to_string()),
            _ => Ok(()),
        }
    }
}

/// Records every statement id it sees, in order.
#[derive(Default)]
pub struct Audit {
    pub seen: Mutex<Vec<String>>,
}

impl Interceptor for Audit {
    fn name(&self) -> &str {
        "audit"
    }

    fn on_bind(&self, statement: &MappedStatement, bound: &BoundTemplate, _argument: &Value) -> Result<(), String> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(format!("{} ({} params)", statement.id, bound.parameters().len()));
        }
        Ok(())
    }
}
