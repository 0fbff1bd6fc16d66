use crate::{
    error::Result,
    functions::{expect_args, unsupported_receiver},
    types::value_to_string,
};
use model::core::value::Value;

/// Element count of a collection, map or string
pub fn eval_size(receiver: &Value, args: &[Value]) -> Result<Value> {
    expect_args("size", args, 0)?;
    let len = receiver
        .len()
        .ok_or_else(|| unsupported_receiver("size", receiver))?;
    Ok(Value::Int(len as i64))
}

pub fn eval_is_empty(receiver: &Value, args: &[Value]) -> Result<Value> {
    expect_args("isEmpty", args, 0)?;
    let len = receiver
        .len()
        .ok_or_else(|| unsupported_receiver("isEmpty", receiver))?;
    Ok(Value::Boolean(len == 0))
}

/// Substring test on strings, membership test on lists and sets.
pub fn eval_contains(receiver: &Value, args: &[Value]) -> Result<Value> {
    expect_args("contains", args, 1)?;
    let needle = &args[0];

    match receiver {
        Value::String(s) => Ok(Value::Boolean(s.contains(&value_to_string(needle)))),
        Value::List(items) | Value::Set(items) => {
            Ok(Value::Boolean(items.iter().any(|item| item.loose_eq(needle))))
        }
        other => Err(unsupported_receiver("contains", other)),
    }
}

pub fn eval_contains_key(receiver: &Value, args: &[Value]) -> Result<Value> {
    expect_args("containsKey", args, 1)?;
    let key = value_to_string(&args[0]);

    match receiver {
        Value::Map(map) => Ok(Value::Boolean(map.contains_key(&key))),
        Value::Record(record) => Ok(Value::Boolean(record.schema().has_field(&key))),
        other => Err(unsupported_receiver("containsKey", other)),
    }
}
