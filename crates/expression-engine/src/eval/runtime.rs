use crate::{
    ast::{BinaryOp, CompiledExpression, UnaryOp},
    context::EvalContext,
    error::{ExpressionError, Result},
    eval::binary::{BinaryOpEvaluator, negate},
    functions::MethodRegistry,
    types::{is_truthy, value_to_string},
};
use model::{core::value::Value, meta::read_property};
use tracing::trace;

/// Trait for evaluating compiled expressions against a binding context
pub trait Evaluator {
    fn evaluate(&self, ctx: &dyn EvalContext) -> Result<Value>;
}

impl Evaluator for CompiledExpression {
    fn evaluate(&self, ctx: &dyn EvalContext) -> Result<Value> {
        match self {
            CompiledExpression::Literal(value) => Ok(value.clone()),

            CompiledExpression::Identifier(name) => ctx.resolve(name),

            CompiledExpression::Property { target, name } => {
                let base = target.evaluate(ctx)?;
                navigate(&base, name)
            }

            CompiledExpression::Index { target, index } => {
                let base = target.evaluate(ctx)?;
                let key = index.evaluate(ctx)?;
                navigate(&base, &value_to_string(&key))
            }

            CompiledExpression::MethodCall { target, name, args } => {
                let receiver = target.evaluate(ctx)?;
                if receiver.is_null() {
                    return Err(ExpressionError::NullTarget {
                        property: format!("{name}()"),
                    });
                }
                let args = args
                    .iter()
                    .map(|arg| arg.evaluate(ctx))
                    .collect::<Result<Vec<_>>>()?;
                trace!("Calling method '{}' on {}", name, receiver.type_name());
                MethodRegistry::builtin().call(name, &receiver, &args)
            }

            CompiledExpression::Unary { op, operand } => {
                let value = operand.evaluate(ctx)?;
                match op {
                    UnaryOp::Not => Ok(Value::Boolean(!is_truthy(&value))),
                    UnaryOp::Negate => negate(&value),
                }
            }

            CompiledExpression::Binary {
                left,
                op: BinaryOp::And,
                right,
            } => {
                let result = is_truthy(&left.evaluate(ctx)?) && is_truthy(&right.evaluate(ctx)?);
                Ok(Value::Boolean(result))
            }

            CompiledExpression::Binary {
                left,
                op: BinaryOp::Or,
                right,
            } => {
                let result = is_truthy(&left.evaluate(ctx)?) || is_truthy(&right.evaluate(ctx)?);
                Ok(Value::Boolean(result))
            }

            CompiledExpression::Binary { left, op, right } => {
                let left = left.evaluate(ctx)?;
                let right = right.evaluate(ctx)?;
                BinaryOpEvaluator::new(&left, &right, *op).evaluate()
            }
        }
    }
}

fn navigate(base: &Value, key: &str) -> Result<Value> {
    if base.is_null() {
        return Err(ExpressionError::NullTarget {
            property: key.to_string(),
        });
    }
    match base {
        // JSON documents are navigated in place.
        Value::Json(json) => {
            let child = match json {
                serde_json::Value::Object(map) => map.get(key),
                serde_json::Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            Ok(child.cloned().map(Value::from_json).unwrap_or(Value::Null))
        }
        other => Ok(read_property(other, key)?),
    }
}
