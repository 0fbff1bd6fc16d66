use crate::error::{MapperError, Result};
use model::core::sql_type::SqlType;
use serde::{Deserialize, Deserializer};
use std::{collections::HashMap, fs, path::Path};

/// Process-level mapper settings, read from JSON. Every field is optional.
///
/// ```json
/// { "jdbcTypeForNull": "NULL", "databaseId": "mysql", "variables": { "schema": "app" } }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// SQL type used to bind a null that declares no SQL type
    #[serde(deserialize_with = "sql_type_name")]
    pub jdbc_type_for_null: SqlType,
    /// Vendor id exposed to templates as `_databaseId`
    pub database_id: Option<String>,
    /// Values for build-time `${...}` substitution
    pub variables: HashMap<String, String>,
    /// Name positional arguments `arg0, arg1..` rather than `0, 1..`
    pub use_actual_param_name: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jdbc_type_for_null: SqlType::Other,
            database_id: None,
            variables: HashMap::new(),
            use_actual_param_name: true,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str, source_name: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| MapperError::Document {
            source_name: source_name.to_string(),
            message: err.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json, &path.display().to_string())
    }

    pub fn with_database_id(mut self, database_id: &str) -> Self {
        self.database_id = Some(database_id.to_string());
        self
    }

    pub fn with_variable(mut self, name: &str, value: &str) -> Self {
        self.variables.insert(name.to_string(), value.to_string());
        self
    }
}

fn sql_type_name<'de, D>(deserializer: D) -> std::result::Result<SqlType, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(serde::de::Error::custom)
}
