use crate::{
    error::{ExpressionError, Result},
    functions::{expect_args, unsupported_receiver},
};
use model::core::value::Value;

fn receiver_str<'a>(method: &str, receiver: &'a Value) -> Result<&'a str> {
    receiver
        .as_str()
        .ok_or_else(|| unsupported_receiver(method, receiver))
}

fn string_arg<'a>(method: &str, args: &'a [Value]) -> Result<&'a str> {
    expect_args(method, args, 1)?;
    args[0]
        .as_str()
        .ok_or_else(|| ExpressionError::InvalidMethodArgs {
            method: method.to_string(),
            message: format!("Expected string, got {}", args[0].type_name()),
        })
}

/// Character count of a string
pub fn eval_length(receiver: &Value, args: &[Value]) -> Result<Value> {
    expect_args("length", args, 0)?;
    let s = receiver_str("length", receiver)?;
    Ok(Value::Int(s.chars().count() as i64))
}

pub fn eval_trim(receiver: &Value, args: &[Value]) -> Result<Value> {
    expect_args("trim", args, 0)?;
    let s = receiver_str("trim", receiver)?;
    Ok(Value::String(s.trim().to_string()))
}

pub fn eval_to_upper_case(receiver: &Value, args: &[Value]) -> Result<Value> {
    expect_args("toUpperCase", args, 0)?;
    let s = receiver_str("toUpperCase", receiver)?;
    Ok(Value::String(s.to_uppercase()))
}

pub fn eval_to_lower_case(receiver: &Value, args: &[Value]) -> Result<Value> {
    expect_args("toLowerCase", args, 0)?;
    let s = receiver_str("toLowerCase", receiver)?;
    Ok(Value::String(s.to_lowercase()))
}

pub fn eval_starts_with(receiver: &Value, args: &[Value]) -> Result<Value> {
    let s = receiver_str("startsWith", receiver)?;
    let prefix = string_arg("startsWith", args)?;
    Ok(Value::Boolean(s.starts_with(prefix)))
}

pub fn eval_ends_with(receiver: &Value, args: &[Value]) -> Result<Value> {
    let s = receiver_str("endsWith", receiver)?;
    let suffix = string_arg("endsWith", args)?;
    Ok(Value::Boolean(s.ends_with(suffix)))
}
