use expression_engine::{EvalContext, ExpressionError};
use model::{core::value::Value, meta::read_property};
use std::collections::HashMap;

/// Binding that always holds the caller's argument.
pub const PARAMETER_OBJECT_KEY: &str = "_parameter";
/// Binding that holds the configured database id, or null.
pub const DATABASE_ID_KEY: &str = "_databaseId";

/// Per-invocation rendering state: the output buffer, the bindings seeded
/// from the argument and the loop scopes currently in effect.
///
/// Name lookup goes innermost loop scope first, then the bindings, then the
/// argument's own properties.
pub struct RenderingContext<'a> {
    argument: &'a Value,
    bindings: HashMap<String, Value>,
    scopes: Vec<HashMap<String, Value>>,
    buffers: Vec<String>,
    unique_number: usize,
}

impl<'a> RenderingContext<'a> {
    pub fn new(argument: &'a Value) -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(PARAMETER_OBJECT_KEY.to_string(), argument.clone());
        bindings.insert(DATABASE_ID_KEY.to_string(), Value::Null);

        Self {
            argument,
            bindings,
            scopes: Vec::new(),
            buffers: vec![String::new()],
            unique_number: 0,
        }
    }

    pub fn with_database_id(mut self, database_id: Option<&str>) -> Self {
        self.bindings.insert(
            DATABASE_ID_KEY.to_string(),
            database_id.map(Value::from).unwrap_or(Value::Null),
        );
        self
    }

    pub fn argument(&self) -> &Value {
        self.argument
    }

    /// Stores a value in the outer bindings, regardless of open loop scopes.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn bindings(&self) -> &HashMap<String, Value> {
        &self.bindings
    }

    pub fn append(&mut self, sql: &str) {
        if let Some(buffer) = self.buffers.last_mut() {
            buffer.push_str(sql);
        }
    }

    /// Text rendered into the current buffer so far.
    pub fn sql(&self) -> &str {
        self.buffers.last().map(String::as_str).unwrap_or_default()
    }

    pub fn next_unique_number(&mut self) -> usize {
        let n = self.unique_number;
        self.unique_number += 1;
        n
    }

    /// Runs `f` against a fresh buffer and hands back what it rendered.
    pub(crate) fn capture<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> (T, String) {
        self.buffers.push(String::new());
        let result = f(self);
        let captured = self.buffers.pop().unwrap_or_default();
        (result, captured)
    }

    /// Runs `f` with `scope` layered over the current names.
    pub(crate) fn scoped<T>(
        &mut self,
        scope: HashMap<String, Value>,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.scopes.push(scope);
        let result = f(self);
        self.scopes.pop();
        result
    }

    pub fn into_parts(mut self) -> (String, HashMap<String, Value>) {
        let sql = self.buffers.drain(..).next().unwrap_or_default();
        (sql, self.bindings)
    }

    fn resolve_from_argument(&self, name: &str) -> expression_engine::Result<Value> {
        match self.argument {
            Value::Null => Ok(Value::Null),
            Value::Map(_) | Value::Record(_) => Ok(read_property(self.argument, name)?),
            Value::Json(serde_json::Value::Object(map)) => Ok(map
                .get(name)
                .cloned()
                .map(Value::from_json)
                .unwrap_or(Value::Null)),
            // A single scalar argument answers to any name.
            scalar if scalar.data_type().is_scalar() => Ok(scalar.clone()),
            _ => Err(ExpressionError::UnresolvedName(name.to_string())),
        }
    }
}

impl EvalContext for RenderingContext<'_> {
    fn resolve(&self, name: &str) -> expression_engine::Result<Value> {
        if let Some(value) = self.scopes.iter().rev().find_map(|scope| scope.get(name)) {
            return Ok(value.clone());
        }
        if let Some(value) = self.bindings.get(name) {
            return Ok(value.clone());
        }
        self.resolve_from_argument(name)
    }
}
