use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use model::core::{data_type::DataType, value::Value};
use std::str::FromStr;
use uuid::Uuid;

/// Converts `value` into the representation `target` expects. Values that
/// cannot be represented are errors; collection and open targets pass the
/// value through untouched.
pub(crate) fn coerce_value(value: Value, target: &DataType) -> Result<Value, String> {
    match target {
        DataType::Boolean => coerce_bool(value),
        DataType::SmallInt => {
            integral(value, target).and_then(|v| narrow(v, target, i16::try_from).map(Value::SmallInt))
        }
        DataType::Int32 => {
            integral(value, target).and_then(|v| narrow(v, target, i32::try_from).map(Value::Int32))
        }
        DataType::Int => integral(value, target).map(Value::Int),
        DataType::Float => match value {
            Value::String(ref s) => s.trim().parse().map(Value::Float).map_err(|_| mismatch(&value, target)),
            other => other.as_f64().map(Value::Float).ok_or_else(|| mismatch(&other, target)),
        },
        DataType::Decimal => match value {
            Value::String(ref s) => BigDecimal::from_str(s.trim())
                .map(Value::Decimal)
                .map_err(|_| mismatch(&value, target)),
            other => other.as_decimal().map(Value::Decimal).ok_or_else(|| mismatch(&other, target)),
        },
        DataType::String => match value {
            Value::String(_) => Ok(value),
            Value::Json(serde_json::Value::String(s)) => Ok(Value::String(s)),
            other if other.data_type().is_scalar() => Ok(Value::String(plain_text(&other))),
            other => Err(mismatch(&other, target)),
        },
        DataType::Bytes => match value {
            Value::Bytes(_) => Ok(value),
            Value::String(s) => Ok(Value::Bytes(s.into_bytes())),
            other => Err(mismatch(&other, target)),
        },
        DataType::Uuid => match value {
            Value::Uuid(_) => Ok(value),
            Value::String(ref s) => Uuid::parse_str(s.trim())
                .map(Value::Uuid)
                .map_err(|_| mismatch(&value, target)),
            other => Err(mismatch(&other, target)),
        },
        DataType::Date => match value {
            Value::Date(_) => Ok(value),
            Value::Timestamp(ts) => Ok(Value::Date(ts.date_naive())),
            Value::TimestampNaive(ts) => Ok(Value::Date(ts.date())),
            Value::String(ref s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|_| mismatch(&value, target)),
            other => Err(mismatch(&other, target)),
        },
        DataType::Timestamp => match value {
            Value::Timestamp(_) => Ok(value),
            Value::TimestampNaive(ts) => Ok(Value::Timestamp(DateTime::<Utc>::from_naive_utc_and_offset(ts, Utc))),
            Value::String(ref s) => parse_datetime(s)
                .map(Value::Timestamp)
                .ok_or_else(|| mismatch(&value, target)),
            other => Err(mismatch(&other, target)),
        },
        DataType::TimestampNaive => match value {
            Value::TimestampNaive(_) => Ok(value),
            Value::Timestamp(ts) => Ok(Value::TimestampNaive(ts.naive_utc())),
            Value::String(ref s) => parse_naive_datetime(s)
                .map(Value::TimestampNaive)
                .ok_or_else(|| mismatch(&value, target)),
            other => Err(mismatch(&other, target)),
        },
        DataType::Json => match value {
            Value::Json(_) => Ok(value),
            other => Ok(Value::Json(other.to_json())),
        },
        _ => Ok(value),
    }
}

fn coerce_bool(value: Value) -> Result<Value, String> {
    match value {
        Value::Boolean(_) => Ok(value),
        Value::String(ref s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Boolean(true)),
            "false" | "0" => Ok(Value::Boolean(false)),
            _ => Err(mismatch(&value, &DataType::Boolean)),
        },
        other => match other.as_i64() {
            Some(0) => Ok(Value::Boolean(false)),
            Some(1) => Ok(Value::Boolean(true)),
            _ => Err(mismatch(&other, &DataType::Boolean)),
        },
    }
}

fn integral(value: Value, target: &DataType) -> Result<i64, String> {
    if let Some(v) = value.as_i64() {
        return Ok(v);
    }
    match &value {
        Value::String(s) => s.trim().parse().map_err(|_| mismatch(&value, target)),
        Value::Decimal(d) if d.is_integer() => {
            bigdecimal::ToPrimitive::to_i64(d).ok_or_else(|| mismatch(&value, target))
        }
        Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(*f as i64),
        _ => Err(mismatch(&value, target)),
    }
}

fn narrow<T, E>(value: i64, target: &DataType, convert: impl Fn(i64) -> Result<T, E>) -> Result<T, String> {
    convert(value).map_err(|_| format!("{value} is out of range for {target}"))
}

fn mismatch(value: &Value, target: &DataType) -> String {
    format!("cannot convert {} value {} to {}", value.type_name(), value, target)
}

/// Text of a scalar without SQL literal quoting.
fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Uuid(v) => v.to_string(),
        Value::Date(v) => v.to_string(),
        Value::Timestamp(v) => v.to_rfc3339(),
        Value::TimestampNaive(v) => v.to_string(),
        Value::Json(v) => v.to_string(),
        other => other.to_string(),
    }
}

fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Some(dt.with_timezone(&Utc));
    }

    parse_naive_datetime(raw).map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

fn parse_naive_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_utc()).ok())
}
