use bigdecimal::Zero;
use model::core::value::Value;

/// Truthiness used by test expressions: booleans as-is, numbers when
/// non-zero, any other non-null value is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Boolean(b) => *b,
        Value::SmallInt(i) => *i != 0,
        Value::Int32(i) => *i != 0,
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::Decimal(d) => !d.is_zero(),
        Value::Json(serde_json::Value::Bool(b)) => *b,
        Value::Json(serde_json::Value::Null) => false,
        _ => true,
    }
}

/// Plain text form of a value, as used for string concatenation and map keys.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::SmallInt(i) => i.to_string(),
        Value::Int32(i) => i.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Decimal(d) => d.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Uuid(u) => u.to_string(),
        Value::Date(d) => d.to_string(),
        Value::Timestamp(t) => t.to_rfc3339(),
        Value::TimestampNaive(t) => t.to_string(),
        Value::Bytes(b) => String::from_utf8_lossy(b).to_string(),
        Value::Json(v) => v.to_string(),
        Value::Null => "null".to_string(),
        Value::List(_) | Value::Set(_) | Value::Map(_) | Value::Record(_) => {
            value.to_json().to_string()
        }
    }
}
