use crate::{
    configuration::{Configuration, ConfigurationBuilder},
    error::{MapperError, Result},
    settings::Settings,
    statement::SqlCommand,
};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path, sync::Arc};
use template::ElementDescriptor;
use tracing::info;

/// On-disk mapper: a namespace with its reusable fragments and statements.
///
/// ```json
/// { "namespace": "users",
///   "fragments": { "columns": ["id, name"] },
///   "statements": [
///     { "id": "findById", "kind": "select", "parameterType": "long",
///       "body": ["select ", {"tag": "include", "attrs": {"refid": "columns"}},
///                " from users where id = #{id}"] } ] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapperDocument {
    pub namespace: String,
    #[serde(default)]
    pub fragments: BTreeMap<String, Vec<ElementDescriptor>>,
    #[serde(default)]
    pub statements: Vec<StatementDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementDefinition {
    pub id: String,
    #[serde(default)]
    pub kind: SqlCommand,
    #[serde(default)]
    pub parameter_type: Option<String>,
    #[serde(default)]
    pub database_id: Option<String>,
    pub body: Vec<ElementDescriptor>,
}

impl MapperDocument {
    pub fn from_json(json: &str, source_name: &str) -> Result<Self> {
        let document: MapperDocument = serde_json::from_str(json).map_err(|err| invalid(source_name, err.to_string()))?;
        document.validate(source_name)?;
        Ok(document)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json, &path.display().to_string())
    }

    fn validate(&self, source_name: &str) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(invalid(source_name, "namespace is required".to_string()));
        }
        let ids = self.statements.iter().map(|s| s.id.as_str());
        for id in self.fragments.keys().map(String::as_str).chain(ids) {
            if id.is_empty() || id.contains('.') {
                return Err(invalid(source_name, format!("invalid id '{id}'")));
            }
        }
        Ok(())
    }
}

fn invalid(source_name: &str, message: String) -> MapperError {
    MapperError::Document {
        source_name: source_name.to_string(),
        message,
    }
}

impl ConfigurationBuilder {
    /// Registers a mapper's fragments and statements. Fragments are visible
    /// to every later mapper by qualified id and to their own namespace by
    /// bare id. Returns the number of statements registered.
    pub fn add_mapper(&mut self, document: &MapperDocument) -> Result<usize> {
        let namespace = &document.namespace;
        for (id, body) in &document.fragments {
            self.add_fragment(&format!("{namespace}.{id}"), body.clone());
        }

        let mut templates = self.templates().clone();
        for (id, body) in &document.fragments {
            templates.add_fragment(id, body.clone());
        }

        let mut registered = 0;
        for definition in &document.statements {
            if self.add_statement(namespace, definition, &templates)? {
                registered += 1;
            }
        }

        info!(
            "Loaded mapper '{}': {} statements, {} fragments",
            namespace,
            registered,
            document.fragments.len()
        );
        Ok(registered)
    }
}

/// Reads every mapper file and assembles the configuration.
pub fn load_configuration<P: AsRef<Path>>(settings: Settings, mappers: &[P]) -> Result<Arc<Configuration>> {
    let mut builder = Configuration::builder(settings);
    for path in mappers {
        builder.add_mapper(&MapperDocument::load(path.as_ref())?)?;
    }
    Ok(builder.build())
}
