use crate::error::{ExpressionError, Result};
use model::core::value::Value;
use std::collections::{BTreeMap, HashMap};

/// Source of the top-level names an expression refers to.
///
/// Everything after the first name (`.prop`, `[index]`, method calls) is
/// navigated by the evaluator; the context only resolves the root.
pub trait EvalContext {
    fn resolve(&self, name: &str) -> Result<Value>;
}

impl EvalContext for HashMap<String, Value> {
    fn resolve(&self, name: &str) -> Result<Value> {
        self.get(name)
            .cloned()
            .ok_or_else(|| ExpressionError::UnresolvedName(name.to_string()))
    }
}

impl EvalContext for BTreeMap<String, Value> {
    fn resolve(&self, name: &str) -> Result<Value> {
        self.get(name)
            .cloned()
            .ok_or_else(|| ExpressionError::UnresolvedName(name.to_string()))
    }
}

/// Context backed by a single value: names are read as its properties.
pub struct ValueContext<'a>(pub &'a Value);

impl EvalContext for ValueContext<'_> {
    fn resolve(&self, name: &str) -> Result<Value> {
        Ok(model::meta::read_property(self.0, name)?)
    }
}
