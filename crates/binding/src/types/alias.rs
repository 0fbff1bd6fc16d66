use crate::error::Result;
use model::core::{data_type::DataType, record::RecordSchema};
use std::{collections::HashMap, sync::Arc};
use tracing::trace;

/// Names usable in `javaType=` attributes and statement parameter types.
///
/// Built-in aliases (`int`, `string`, `map`, ...) always resolve; record
/// schemas and extra aliases are registered per configuration.
#[derive(Debug, Clone, Default)]
pub struct TypeAliasRegistry {
    aliases: HashMap<String, DataType>,
}

impl TypeAliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, alias: &str, data_type: DataType) {
        self.aliases.insert(alias.trim().to_lowercase(), data_type);
    }

    /// Registers a record schema under its own name.
    pub fn register_record(&mut self, schema: Arc<RecordSchema>) {
        let name = schema.name.clone();
        self.register(&name, DataType::Record(schema));
    }

    pub fn resolve(&self, alias: &str) -> Result<DataType> {
        if let Some(data_type) = self.aliases.get(&alias.trim().to_lowercase()) {
            trace!("Resolved type alias '{}' to {}", alias, data_type);
            return Ok(data_type.clone());
        }
        Ok(DataType::from_alias(alias)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindingError;
    use model::ModelError;

    #[test]
    fn test_registered_aliases_shadow_builtins() {
        let mut aliases = TypeAliasRegistry::new();
        let user = RecordSchema::builder("User")
            .field("id", DataType::Int)
            .build();
        aliases.register_record(user.clone());
        aliases.register("Money", DataType::Decimal);

        assert_eq!(aliases.resolve("user").unwrap(), DataType::Record(user));
        assert_eq!(aliases.resolve("money").unwrap(), DataType::Decimal);
        assert_eq!(aliases.resolve("int").unwrap(), DataType::Int32);
    }

    #[test]
    fn test_unknown_alias_is_a_configuration_error() {
        let err = TypeAliasRegistry::new().resolve("com.example.Missing").unwrap_err();
        assert_eq!(
            err,
            BindingError::Model(ModelError::UnknownTypeAlias("com.example.Missing".to_string()))
        );
        assert!(err.is_configuration());
    }
}
