use crate::error::CliError;
use binding::{BoundTemplate, ParamStore};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ParameterReport {
    pub ordinal: usize,
    pub property: String,
    pub mode: String,
    pub sql_type: Option<String>,
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct RenderReport {
    pub statement: String,
    pub sql: String,
    pub parameters: Vec<ParameterReport>,
}

impl RenderReport {
    pub fn new(statement: &str, sql: String, bound: &BoundTemplate, store: &ParamStore) -> Self {
        let parameters = bound
            .parameters()
            .iter()
            .enumerate()
            .map(|(index, param)| {
                let ordinal = index + 1;
                let bound = store.params.get(&ordinal);
                let registered = store.outputs.get(&ordinal);
                ParameterReport {
                    ordinal,
                    property: param.property.clone(),
                    mode: format!("{:?}", param.mode),
                    sql_type: bound
                        .and_then(|p| p.sql_type)
                        .or(registered.map(|o| o.sql_type))
                        .or(param.sql_type)
                        .map(|t| t.name().to_string()),
                    value: bound.map(|p| p.value.to_json()),
                }
            })
            .collect();

        Self {
            statement: statement.to_string(),
            sql,
            parameters,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub statements: Vec<CheckedStatement>,
}

#[derive(Debug, Serialize)]
pub struct CheckedStatement {
    pub id: String,
    pub kind: String,
    pub dynamic: bool,
}

pub fn to_json<T: Serialize>(report: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(report).map_err(CliError::JsonSerialize)
}

pub fn emit(json: &str, output: Option<&str>) -> Result<(), CliError> {
    match output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
