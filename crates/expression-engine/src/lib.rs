pub mod ast;
pub mod cache;
pub mod context;
pub mod error;
pub mod eval;
pub mod expression;
pub mod functions;
pub mod parser;
pub mod types;

pub use cache::ExpressionCache;
pub use context::{EvalContext, ValueContext};
pub use error::{ExpressionError, Result};
pub use eval::Evaluator;
pub use expression::Expression;
pub use functions::MethodRegistry;
pub use types::{is_truthy, value_to_string};

use model::core::value::Value;

/// Evaluate `source` against `ctx`, parsing through the shared cache.
pub fn evaluate(source: &str, ctx: &dyn EvalContext) -> Result<Value> {
    ExpressionCache::global().get_or_parse(source)?.evaluate(ctx)
}

pub fn evaluate_boolean(source: &str, ctx: &dyn EvalContext) -> Result<bool> {
    ExpressionCache::global()
        .get_or_parse(source)?
        .evaluate_boolean(ctx)
}
