use crate::{
    core::{data_type::DataType, value::Value},
    error::ModelError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub data_type: DataType,
}

/// Compile-time field table of a record type.
///
/// Schemas are built once (typically in a `lazy_static`) and shared by every
/// record of that type, so property lookups never need runtime reflection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordSchema {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl RecordSchema {
    pub fn builder(name: &str) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            name: name.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == field)
    }

    pub fn field(&self, field: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.index_of(field).is_some()
    }
}

pub struct RecordSchemaBuilder {
    name: String,
    fields: Vec<FieldDef>,
}

impl RecordSchemaBuilder {
    pub fn field(mut self, name: &str, data_type: DataType) -> Self {
        self.fields.push(FieldDef {
            name: name.to_string(),
            data_type,
        });
        self
    }

    pub fn build(self) -> Arc<RecordSchema> {
        Arc::new(RecordSchema {
            name: self.name,
            fields: self.fields,
        })
    }
}

/// A value of a record type: one slot per schema field, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct Record {
    schema: Arc<RecordSchema>,
    values: Vec<Value>,
}

#[derive(Deserialize)]
struct RawRecord {
    schema: Arc<RecordSchema>,
    values: Vec<Value>,
}

impl TryFrom<RawRecord> for Record {
    type Error = ModelError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        if raw.values.len() != raw.schema.fields.len() {
            return Err(ModelError::FieldCountMismatch {
                type_name: raw.schema.name.clone(),
                expected: raw.schema.fields.len(),
                actual: raw.values.len(),
            });
        }
        Ok(Self {
            schema: raw.schema,
            values: raw.values,
        })
    }
}

impl Record {
    /// Creates a record with every field set to `Null`.
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        let values = vec![Value::Null; schema.fields.len()];
        Self { schema, values }
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Result<Self, ModelError> {
        self.set(field, value.into())?;
        Ok(self)
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.schema.index_of(field).and_then(|i| self.values.get(i))
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.schema
            .index_of(field)
            .and_then(|i| self.values.get_mut(i))
    }

    pub fn set(&mut self, field: &str, value: Value) -> Result<(), ModelError> {
        match self.schema.index_of(field) {
            Some(i) if i < self.values.len() => {
                self.values[i] = value;
                Ok(())
            }
            _ => Err(ModelError::NoSuchProperty {
                property: field.to_string(),
                type_name: self.schema.name.clone(),
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .zip(self.values.iter())
    }
}
