use crate::{
    ast::CompiledExpression,
    context::EvalContext,
    error::{ExpressionError, Result},
    eval::Evaluator,
    parser,
    types::is_truthy,
};
use model::core::value::Value;
use std::fmt;

/// An expression parsed once and evaluated many times.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    compiled: CompiledExpression,
}

impl Expression {
    pub fn parse(source: &str) -> Result<Self> {
        Ok(Self {
            source: source.to_string(),
            compiled: parser::parse(source)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn compiled(&self) -> &CompiledExpression {
        &self.compiled
    }

    pub fn evaluate(&self, ctx: &dyn EvalContext) -> Result<Value> {
        self.compiled.evaluate(ctx)
    }

    pub fn evaluate_boolean(&self, ctx: &dyn EvalContext) -> Result<bool> {
        Ok(is_truthy(&self.evaluate(ctx)?))
    }

    /// Evaluates to a sequence of `(index, item)` pairs.
    ///
    /// Lists and sets yield their position as index; maps yield each entry
    /// with the key as index. Null and scalar results are errors.
    pub fn evaluate_iterable(&self, ctx: &dyn EvalContext) -> Result<Vec<(Value, Value)>> {
        match self.evaluate(ctx)? {
            Value::Null => Err(ExpressionError::NullCollection(self.source.clone())),
            Value::List(items) | Value::Set(items) => Ok(enumerate(items)),
            Value::Map(map) => Ok(map
                .into_iter()
                .map(|(key, value)| (Value::String(key), value))
                .collect()),
            Value::Json(serde_json::Value::Array(items)) => {
                Ok(enumerate(items.into_iter().map(Value::from_json).collect()))
            }
            other => Err(ExpressionError::NotIterable {
                expression: self.source.clone(),
                type_name: other.type_name(),
            }),
        }
    }
}

fn enumerate(items: Vec<Value>) -> Vec<(Value, Value)> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| (Value::Int(i as i64), item))
        .collect()
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
