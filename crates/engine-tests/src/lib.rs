#![allow(dead_code)]

use engine_core::{Configuration, MapperDocument, MapperSession, Settings};
use model::core::value::Value;
use std::{collections::BTreeMap, io::Write};

pub mod integration;
pub mod plugins;
pub mod utils;

/// Session over the given mapper documents, with default settings.
pub fn session(mappers: &[&str]) -> MapperSession {
    session_with(Settings::default(), mappers)
}

pub fn session_with(settings: Settings, mappers: &[&str]) -> MapperSession {
    let mut builder = Configuration::builder(settings);
    for (i, json) in mappers.iter().enumerate() {
        let document = MapperDocument::from_json(json, &format!("mapper{i}.json")).expect("parse mapper");
        builder.add_mapper(&document).expect("register mapper");
    }
    MapperSession::new(builder.build())
}

/// Map argument from name/value pairs.
pub fn args(pairs: Vec<(&str, Value)>) -> Value {
    Value::Map(
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>(),
    )
}

pub fn ints(values: &[i64]) -> Value {
    Value::List(values.iter().copied().map(Value::Int).collect())
}

/// Writes `json` to a fresh temp file that lives as long as the handle.
pub fn mapper_file(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(json.as_bytes()).expect("write mapper");
    file
}
