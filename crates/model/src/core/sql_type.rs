use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Column-side type of a parameter, as understood by the driver.
///
/// Type codes follow the standard `java.sql.Types` numbering so drivers that
/// speak that protocol can use them unchanged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SqlType {
    Array,
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Real,
    Double,
    Numeric,
    Decimal,
    Char,
    VarChar,
    LongVarChar,
    NVarChar,
    Date,
    Time,
    Timestamp,
    TimestampWithTimezone,
    Binary,
    VarBinary,
    LongVarBinary,
    Blob,
    Clob,
    Boolean,
    Null,
    Other,
    Cursor,
    Undefined,
    Json,
}

impl SqlType {
    pub fn type_code(&self) -> i32 {
        match self {
            SqlType::Array => 2003,
            SqlType::Bit => -7,
            SqlType::TinyInt => -6,
            SqlType::SmallInt => 5,
            SqlType::Integer => 4,
            SqlType::BigInt => -5,
            SqlType::Float => 6,
            SqlType::Real => 7,
            SqlType::Double => 8,
            SqlType::Numeric => 2,
            SqlType::Decimal => 3,
            SqlType::Char => 1,
            SqlType::VarChar => 12,
            SqlType::LongVarChar => -1,
            SqlType::NVarChar => -9,
            SqlType::Date => 91,
            SqlType::Time => 92,
            SqlType::Timestamp => 93,
            SqlType::TimestampWithTimezone => 2014,
            SqlType::Binary => -2,
            SqlType::VarBinary => -3,
            SqlType::LongVarBinary => -4,
            SqlType::Blob => 2004,
            SqlType::Clob => 2005,
            SqlType::Boolean => 16,
            SqlType::Null => 0,
            SqlType::Other => 1111,
            SqlType::Cursor => -10,
            SqlType::Undefined => i32::MIN + 1000,
            SqlType::Json => 5001,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SqlType::Array => "ARRAY",
            SqlType::Bit => "BIT",
            SqlType::TinyInt => "TINYINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Float => "FLOAT",
            SqlType::Real => "REAL",
            SqlType::Double => "DOUBLE",
            SqlType::Numeric => "NUMERIC",
            SqlType::Decimal => "DECIMAL",
            SqlType::Char => "CHAR",
            SqlType::VarChar => "VARCHAR",
            SqlType::LongVarChar => "LONGVARCHAR",
            SqlType::NVarChar => "NVARCHAR",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::TimestampWithTimezone => "TIMESTAMP_WITH_TIMEZONE",
            SqlType::Binary => "BINARY",
            SqlType::VarBinary => "VARBINARY",
            SqlType::LongVarBinary => "LONGVARBINARY",
            SqlType::Blob => "BLOB",
            SqlType::Clob => "CLOB",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Null => "NULL",
            SqlType::Other => "OTHER",
            SqlType::Cursor => "CURSOR",
            SqlType::Undefined => "UNDEFINED",
            SqlType::Json => "JSON",
        }
    }
}

impl FromStr for SqlType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sql_type = match s.trim().to_uppercase().as_str() {
            "ARRAY" => SqlType::Array,
            "BIT" => SqlType::Bit,
            "TINYINT" => SqlType::TinyInt,
            "SMALLINT" => SqlType::SmallInt,
            "INTEGER" | "INT" => SqlType::Integer,
            "BIGINT" => SqlType::BigInt,
            "FLOAT" => SqlType::Float,
            "REAL" => SqlType::Real,
            "DOUBLE" => SqlType::Double,
            "NUMERIC" => SqlType::Numeric,
            "DECIMAL" => SqlType::Decimal,
            "CHAR" => SqlType::Char,
            "VARCHAR" => SqlType::VarChar,
            "LONGVARCHAR" => SqlType::LongVarChar,
            "NVARCHAR" => SqlType::NVarChar,
            "DATE" => SqlType::Date,
            "TIME" => SqlType::Time,
            "TIMESTAMP" => SqlType::Timestamp,
            "TIMESTAMP_WITH_TIMEZONE" => SqlType::TimestampWithTimezone,
            "BINARY" => SqlType::Binary,
            "VARBINARY" => SqlType::VarBinary,
            "LONGVARBINARY" => SqlType::LongVarBinary,
            "BLOB" => SqlType::Blob,
            "CLOB" => SqlType::Clob,
            "BOOLEAN" => SqlType::Boolean,
            "NULL" => SqlType::Null,
            "OTHER" => SqlType::Other,
            "CURSOR" => SqlType::Cursor,
            "UNDEFINED" => SqlType::Undefined,
            "JSON" => SqlType::Json,
            _ => return Err(ModelError::UnknownSqlType(s.to_string())),
        };
        Ok(sql_type)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
