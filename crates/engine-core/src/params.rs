use model::core::value::Value;
use std::collections::BTreeMap;

const GENERIC_NAME_PREFIX: &str = "param";

/// Turns a call's positional arguments into the single argument value a
/// mapped statement renders against.
///
/// Arguments may carry a declared name. Without one they are named `arg0`,
/// `arg1`.. (or `0`, `1`.. when actual names are disabled).
#[derive(Debug, Clone)]
pub struct ParamNameResolver {
    names: Vec<String>,
    has_declared_names: bool,
}

impl ParamNameResolver {
    pub fn new(declared: &[Option<&str>], use_actual_param_name: bool) -> Self {
        let names = declared
            .iter()
            .enumerate()
            .map(|(i, name)| match name {
                Some(name) => name.to_string(),
                None if use_actual_param_name => format!("arg{i}"),
                None => i.to_string(),
            })
            .collect();

        Self {
            names,
            has_declared_names: declared.iter().any(Option::is_some),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// A single undeclared argument is passed through (collections wrapped);
    /// otherwise every argument goes into a map under its name and under a
    /// generic `paramN` alias that never replaces a declared name.
    pub fn named_params(&self, args: Vec<Value>) -> Value {
        if args.is_empty() || self.names.is_empty() {
            return Value::Null;
        }
        if !self.has_declared_names && self.names.len() == 1 {
            return args.into_iter().next().map(wrap_collection).unwrap_or(Value::Null);
        }

        let mut params = BTreeMap::new();
        for (i, (name, value)) in self.names.iter().zip(args).enumerate() {
            let generic = format!("{GENERIC_NAME_PREFIX}{}", i + 1);
            if !self.names.contains(&generic) {
                params.insert(generic, value.clone());
            }
            params.insert(name.clone(), value);
        }
        Value::Map(params)
    }
}

/// Gives a bare collection argument names templates can refer to: a list is
/// reachable as `collection` and `list`, a set as `collection`.
pub fn wrap_collection(value: Value) -> Value {
    match value {
        Value::List(_) => {
            let mut map = BTreeMap::new();
            map.insert("collection".to_string(), value.clone());
            map.insert("list".to_string(), value);
            Value::Map(map)
        }
        Value::Set(_) => {
            let mut map = BTreeMap::new();
            map.insert("collection".to_string(), value);
            Value::Map(map)
        }
        other => other,
    }
}
