pub mod collection;
pub mod string;

use crate::error::{ExpressionError, Result};
use lazy_static::lazy_static;
use model::core::value::Value;
use std::collections::HashMap;

/// Method implementation: receiver plus evaluated arguments.
pub type MethodImpl = fn(&Value, &[Value]) -> Result<Value>;

lazy_static! {
    static ref BUILTIN_METHODS: MethodRegistry = MethodRegistry::new();
}

/// Registry of the methods expressions may call on values, e.g.
/// `list.size()` or `name.trim()`.
pub struct MethodRegistry {
    methods: HashMap<String, MethodImpl>,
}

impl MethodRegistry {
    /// Create a new registry with all built-in methods
    pub fn new() -> Self {
        let mut registry = Self {
            methods: HashMap::new(),
        };

        registry.register("size", collection::eval_size);
        registry.register("isEmpty", collection::eval_is_empty);
        registry.register("contains", collection::eval_contains);
        registry.register("containsKey", collection::eval_contains_key);
        registry.register("length", string::eval_length);
        registry.register("trim", string::eval_trim);
        registry.register("toUpperCase", string::eval_to_upper_case);
        registry.register("toLowerCase", string::eval_to_lower_case);
        registry.register("startsWith", string::eval_starts_with);
        registry.register("endsWith", string::eval_ends_with);

        registry
    }

    pub fn builtin() -> &'static MethodRegistry {
        &BUILTIN_METHODS
    }

    pub fn register(&mut self, name: &str, method: MethodImpl) {
        self.methods.insert(name.to_lowercase(), method);
    }

    pub fn call(&self, name: &str, receiver: &Value, args: &[Value]) -> Result<Value> {
        let method = self
            .methods
            .get(&name.to_lowercase())
            .ok_or_else(|| ExpressionError::UnknownMethod(name.to_string()))?;

        method(receiver, args)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(&name.to_lowercase())
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn expect_args(method: &str, args: &[Value], count: usize) -> Result<()> {
    if args.len() == count {
        Ok(())
    } else {
        Err(ExpressionError::InvalidMethodArgs {
            method: method.to_string(),
            message: format!("Expected {} argument(s), got {}", count, args.len()),
        })
    }
}

pub(crate) fn unsupported_receiver(method: &str, receiver: &Value) -> ExpressionError {
    ExpressionError::InvalidMethodArgs {
        method: method.to_string(),
        message: format!("Not applicable to {}", receiver.type_name()),
    }
}
