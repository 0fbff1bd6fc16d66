use crate::{core::record::RecordSchema, error::ModelError};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, sync::Arc};

/// Host-side type of a bound value.
///
/// This is the type a placeholder's value is expected to have before it is
/// converted for the driver (the "target type" of a parameter). `Any` is the
/// generic fallback used whenever the type cannot be inferred up front.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DataType {
    Any,
    Boolean,
    SmallInt,
    Int32,
    Int,
    Float,
    Decimal,
    String,
    Bytes,
    Uuid,
    Date,
    Timestamp,
    TimestampNaive,
    Json,
    List,
    Set,
    Map,
    Record(Arc<RecordSchema>),
    /// Result cursor returned through a stored-procedure output parameter.
    Cursor,
}

lazy_static! {
    static ref TYPE_ALIASES: HashMap<&'static str, DataType> = build_alias_map();
}

impl DataType {
    /// Resolves a built-in type alias such as `int`, `string` or `map`.
    ///
    /// Aliases are case-insensitive. Record types are not known here; see the
    /// alias registry in the binding crate for those.
    pub fn from_alias(alias: &str) -> Result<Self, ModelError> {
        TYPE_ALIASES
            .get(alias.trim().to_lowercase().as_str())
            .cloned()
            .ok_or_else(|| ModelError::UnknownTypeAlias(alias.to_string()))
    }

    pub fn name(&self) -> &str {
        match self {
            DataType::Any => "any",
            DataType::Boolean => "boolean",
            DataType::SmallInt => "smallint",
            DataType::Int32 => "int",
            DataType::Int => "long",
            DataType::Float => "double",
            DataType::Decimal => "decimal",
            DataType::String => "string",
            DataType::Bytes => "bytes",
            DataType::Uuid => "uuid",
            DataType::Date => "date",
            DataType::Timestamp => "timestamp",
            DataType::TimestampNaive => "timestamp_naive",
            DataType::Json => "json",
            DataType::List => "list",
            DataType::Set => "set",
            DataType::Map => "map",
            DataType::Record(schema) => &schema.name,
            DataType::Cursor => "cursor",
        }
    }

    /// Single values that a converter can write to a statement directly.
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            DataType::Any
                | DataType::List
                | DataType::Set
                | DataType::Map
                | DataType::Record(_)
                | DataType::Cursor
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::SmallInt | DataType::Int32 | DataType::Int | DataType::Float | DataType::Decimal
        )
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, DataType::List | DataType::Set)
    }

    pub fn as_record(&self) -> Option<&Arc<RecordSchema>> {
        match self {
            DataType::Record(schema) => Some(schema),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn build_alias_map() -> HashMap<&'static str, DataType> {
    use DataType::*;

    let entries = [
        ("any", Any),
        ("object", Any),
        ("boolean", Boolean),
        ("bool", Boolean),
        ("short", SmallInt),
        ("smallint", SmallInt),
        ("i16", SmallInt),
        ("int", Int32),
        ("integer", Int32),
        ("i32", Int32),
        ("long", Int),
        ("bigint", Int),
        ("i64", Int),
        ("float", Float),
        ("double", Float),
        ("f64", Float),
        ("decimal", Decimal),
        ("bigdecimal", Decimal),
        ("string", String),
        ("str", String),
        ("bytes", Bytes),
        ("byte[]", Bytes),
        ("uuid", Uuid),
        ("date", Date),
        ("timestamp", Timestamp),
        ("datetime", Timestamp),
        ("timestamp_naive", TimestampNaive),
        ("localdatetime", TimestampNaive),
        ("json", Json),
        ("list", List),
        ("arraylist", List),
        ("collection", List),
        ("set", Set),
        ("hashset", Set),
        ("map", Map),
        ("hashmap", Map),
        ("cursor", Cursor),
        ("resultset", Cursor),
    ];

    entries.into_iter().collect()
}
