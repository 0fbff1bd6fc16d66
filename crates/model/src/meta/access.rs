use crate::{
    core::{data_type::DataType, record::Record, value::Value},
    error::ModelError,
    meta::path::PropertyPath,
};
use std::collections::{BTreeMap, HashMap};

static NULL: Value = Value::Null;

/// Capability interface every navigable argument shape implements.
///
/// `get_property` returns `Ok(None)` for properties that are legitimately
/// absent (a missing map key reads as null) and an error for properties that
/// cannot exist (an unknown record field, a malformed index).
pub trait PropertyAccess {
    fn get_property(&self, name: &str) -> Result<Option<&Value>, ModelError>;

    fn property_mut(&mut self, name: &str) -> Result<&mut Value, ModelError>;

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), ModelError>;

    fn has_property(&self, name: &str) -> bool;

    /// Statically declared type of a property, when the shape knows it.
    fn declared_type(&self, _name: &str) -> Option<DataType> {
        None
    }
}

impl PropertyAccess for Record {
    fn get_property(&self, name: &str) -> Result<Option<&Value>, ModelError> {
        self.get(name)
            .map(Some)
            .ok_or_else(|| no_such_property(name, &self.schema().name))
    }

    fn property_mut(&mut self, name: &str) -> Result<&mut Value, ModelError> {
        let type_name = self.schema().name.clone();
        self.get_mut(name)
            .ok_or_else(|| no_such_property(name, &type_name))
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), ModelError> {
        self.set(name, value)
    }

    fn has_property(&self, name: &str) -> bool {
        self.schema().has_field(name)
    }

    fn declared_type(&self, name: &str) -> Option<DataType> {
        self.schema().field(name).map(|f| f.data_type.clone())
    }
}

impl PropertyAccess for BTreeMap<String, Value> {
    fn get_property(&self, name: &str) -> Result<Option<&Value>, ModelError> {
        Ok(self.get(name))
    }

    fn property_mut(&mut self, name: &str) -> Result<&mut Value, ModelError> {
        Ok(self.entry(name.to_string()).or_insert(Value::Null))
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), ModelError> {
        self.insert(name.to_string(), value);
        Ok(())
    }

    fn has_property(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl PropertyAccess for HashMap<String, Value> {
    fn get_property(&self, name: &str) -> Result<Option<&Value>, ModelError> {
        Ok(self.get(name))
    }

    fn property_mut(&mut self, name: &str) -> Result<&mut Value, ModelError> {
        Ok(self.entry(name.to_string()).or_insert(Value::Null))
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), ModelError> {
        self.insert(name.to_string(), value);
        Ok(())
    }

    fn has_property(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

impl PropertyAccess for Vec<Value> {
    fn get_property(&self, name: &str) -> Result<Option<&Value>, ModelError> {
        let index = parse_index(name)?;
        self.get(index).map(Some).ok_or(ModelError::IndexOutOfBounds {
            path: name.to_string(),
            index,
            len: self.len(),
        })
    }

    fn property_mut(&mut self, name: &str) -> Result<&mut Value, ModelError> {
        let index = parse_index(name)?;
        let len = self.len();
        self.get_mut(index).ok_or(ModelError::IndexOutOfBounds {
            path: name.to_string(),
            index,
            len,
        })
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), ModelError> {
        *self.property_mut(name)? = value;
        Ok(())
    }

    fn has_property(&self, name: &str) -> bool {
        parse_index(name).is_ok_and(|i| i < self.len())
    }
}

fn adapter(value: &Value) -> Option<&dyn PropertyAccess> {
    match value {
        Value::Record(record) => Some(record as &dyn PropertyAccess),
        Value::Map(map) => Some(map as &dyn PropertyAccess),
        Value::List(items) | Value::Set(items) => Some(items as &dyn PropertyAccess),
        _ => None,
    }
}

fn adapter_mut(value: &mut Value) -> Option<&mut dyn PropertyAccess> {
    match value {
        Value::Record(record) => Some(record as &mut dyn PropertyAccess),
        Value::Map(map) => Some(map as &mut dyn PropertyAccess),
        Value::List(items) | Value::Set(items) => Some(items as &mut dyn PropertyAccess),
        _ => None,
    }
}

/// Reads a single property, map key or index off `value`.
pub fn read_property(value: &Value, key: &str) -> Result<Value, ModelError> {
    let access = adapter(value).ok_or_else(|| ModelError::NotNavigable {
        path: key.to_string(),
        segment: key.to_string(),
        type_name: value.type_name(),
    })?;
    Ok(access.get_property(key)?.cloned().unwrap_or(Value::Null))
}

/// Flattens `a.b[0]` into the lookup keys `a`, `b`, `0`.
fn keys(path: &PropertyPath) -> impl Iterator<Item = &str> {
    path.segments().iter().flat_map(|segment| {
        let name = (!segment.name.is_empty()).then_some(segment.name.as_str());
        name.into_iter().chain(segment.index.as_deref())
    })
}

fn walk<'a, 'k>(
    mut current: &'a Value,
    keys: impl Iterator<Item = &'k str>,
    path: &PropertyPath,
) -> Result<&'a Value, ModelError> {
    for key in keys {
        if current.is_null() {
            return Ok(&NULL);
        }
        let access = adapter(current).ok_or_else(|| not_navigable(path, key, current))?;
        current = access
            .get_property(key)
            .map_err(|e| with_path(e, path))?
            .unwrap_or(&NULL);
    }
    Ok(current)
}

/// Reads `path` off `root`. Null intermediates read as null; missing map keys
/// read as null; unknown record fields and bad indexes are errors.
pub fn get_path(root: &Value, path: &PropertyPath) -> Result<Value, ModelError> {
    walk(root, keys(path), path).cloned()
}

/// Same as [`get_path`], but the first key is looked up in `root` itself.
pub fn get_path_in(root: &dyn PropertyAccess, path: &PropertyPath) -> Result<Value, ModelError> {
    let mut keys = keys(path);
    let Some(first) = keys.next() else {
        return Ok(Value::Null);
    };
    let start = root
        .get_property(first)
        .map_err(|e| with_path(e, path))?
        .unwrap_or(&NULL);
    walk(start, keys, path).cloned()
}

pub fn set_path(root: &mut Value, path: &PropertyPath, value: Value) -> Result<(), ModelError> {
    let keys: Vec<&str> = keys(path).collect();
    let Some((last, parents)) = keys.split_last() else {
        return Err(ModelError::InvalidPath {
            path: path.to_string(),
            message: "nothing to set".to_string(),
        });
    };

    let mut current = root;
    for key in parents {
        let type_name = current.type_name();
        let Some(access) = adapter_mut(current) else {
            return Err(ModelError::NotNavigable {
                path: path.to_string(),
                segment: key.to_string(),
                type_name,
            });
        };
        let next = access.property_mut(key).map_err(|e| with_path(e, path))?;
        // Missing intermediates are created as maps.
        if next.is_null() {
            *next = Value::Map(BTreeMap::new());
        }
        current = next;
    }

    let type_name = current.type_name();
    match adapter_mut(current) {
        Some(access) => access
            .set_property(last, value)
            .map_err(|e| with_path(e, path)),
        None => Err(ModelError::NotNavigable {
            path: path.to_string(),
            segment: last.to_string(),
            type_name,
        }),
    }
}

/// Static type of `path` within a declared type. `None` when the path cannot
/// be followed from type information alone.
pub fn property_type(data_type: &DataType, path: &PropertyPath) -> Option<DataType> {
    let mut current = data_type.clone();
    for segment in path.segments() {
        if !segment.name.is_empty() {
            current = match &current {
                DataType::Record(schema) => schema.field(&segment.name)?.data_type.clone(),
                _ => return None,
            };
        }
        if segment.index.is_some() {
            // Element types of collections and maps are not tracked.
            current = match current {
                DataType::List | DataType::Set | DataType::Map | DataType::Json | DataType::Any => {
                    DataType::Any
                }
                _ => return None,
            };
        }
    }
    Some(current)
}

pub fn has_property(data_type: &DataType, path: &PropertyPath) -> bool {
    property_type(data_type, path).is_some()
}

fn walk_type<'a, 'k>(
    mut current: &'a Value,
    mut declared: Option<DataType>,
    keys: impl Iterator<Item = &'k str>,
) -> Option<DataType> {
    for key in keys {
        if current.is_null() {
            return Some(DataType::Any);
        }
        let access = adapter(current)?;
        if !access.has_property(key) {
            return None;
        }
        declared = access.declared_type(key);
        current = access.get_property(key).ok()?.unwrap_or(&NULL);
    }

    if current.is_null() {
        Some(declared.unwrap_or(DataType::Any))
    } else {
        Some(current.data_type())
    }
}

/// Runtime type found at `path`, or `None` when some key along the way is
/// not present. A null value reports its declared type, or `Any`.
pub fn value_type_at(root: &Value, path: &PropertyPath) -> Option<DataType> {
    walk_type(root, None, keys(path))
}

/// Same as [`value_type_at`], but the first key is looked up in `root` itself.
pub fn value_type_in(root: &dyn PropertyAccess, path: &PropertyPath) -> Option<DataType> {
    let mut keys = keys(path);
    let first = keys.next()?;
    if !root.has_property(first) {
        return None;
    }
    let declared = root.declared_type(first);
    let start = root.get_property(first).ok()?.unwrap_or(&NULL);
    walk_type(start, declared, keys)
}

fn parse_index(index: &str) -> Result<usize, ModelError> {
    index.parse::<usize>().map_err(|_| ModelError::InvalidIndex {
        path: index.to_string(),
        index: index.to_string(),
    })
}

fn no_such_property(name: &str, type_name: &str) -> ModelError {
    ModelError::NoSuchProperty {
        property: name.to_string(),
        type_name: type_name.to_string(),
    }
}

fn not_navigable(path: &PropertyPath, key: &str, value: &Value) -> ModelError {
    ModelError::NotNavigable {
        path: path.to_string(),
        segment: key.to_string(),
        type_name: value.type_name(),
    }
}

fn with_path(err: ModelError, path: &PropertyPath) -> ModelError {
    match err {
        ModelError::IndexOutOfBounds { index, len, .. } => ModelError::IndexOutOfBounds {
            path: path.to_string(),
            index,
            len,
        },
        ModelError::InvalidIndex { index, .. } => ModelError::InvalidIndex {
            path: path.to_string(),
            index,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::RecordSchema;
    use std::sync::Arc;

    fn address_schema() -> Arc<RecordSchema> {
        RecordSchema::builder("Address")
            .field("city", DataType::String)
            .build()
    }

    fn user_schema() -> Arc<RecordSchema> {
        RecordSchema::builder("User")
            .field("id", DataType::Int)
            .field("name", DataType::String)
            .field("address", DataType::Record(address_schema()))
            .field("roles", DataType::List)
            .build()
    }

    fn user() -> Value {
        let address = Record::new(address_schema()).with("city", "Oslo").unwrap();
        Value::Record(
            Record::new(user_schema())
                .with("id", 7i64)
                .unwrap()
                .with("name", "x")
                .unwrap()
                .with("address", address)
                .unwrap()
                .with("roles", vec![Value::from("admin"), Value::from("dev")])
                .unwrap(),
        )
    }

    fn path(p: &str) -> PropertyPath {
        PropertyPath::parse(p).unwrap()
    }

    #[test]
    fn test_get_nested_record_and_index() {
        let user = user();
        assert_eq!(get_path(&user, &path("address.city")).unwrap(), Value::from("Oslo"));
        assert_eq!(get_path(&user, &path("roles[1]")).unwrap(), Value::from("dev"));
    }

    #[test]
    fn test_get_unknown_record_field_fails() {
        let err = get_path(&user(), &path("email")).unwrap_err();
        assert!(matches!(err, ModelError::NoSuchProperty { .. }));
    }

    #[test]
    fn test_get_missing_map_key_is_null() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), Value::Int(1));
        let value = Value::Map(map);
        assert_eq!(get_path(&value, &path("b")).unwrap(), Value::Null);
        assert_eq!(get_path(&value, &path("b.c")).unwrap(), Value::Null);
    }

    #[test]
    fn test_get_through_scalar_fails() {
        let err = get_path(&user(), &path("name.first")).unwrap_err();
        assert!(matches!(err, ModelError::NotNavigable { .. }));
    }

    #[test]
    fn test_index_out_of_bounds_reports_full_path() {
        let err = get_path(&user(), &path("roles[5]")).unwrap_err();
        assert_eq!(
            err,
            ModelError::IndexOutOfBounds {
                path: "roles[5]".to_string(),
                index: 5,
                len: 2,
            }
        );
    }

    #[test]
    fn test_set_path_creates_intermediate_maps() {
        let mut value = Value::Map(BTreeMap::new());
        set_path(&mut value, &path("out.total"), Value::Int(3)).unwrap();
        assert_eq!(get_path(&value, &path("out.total")).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_set_path_on_record_field() {
        let mut user = user();
        set_path(&mut user, &path("address.city"), Value::from("Bergen")).unwrap();
        assert_eq!(get_path(&user, &path("address.city")).unwrap(), Value::from("Bergen"));
        assert!(set_path(&mut user, &path("address.zip"), Value::Null).is_err());
    }

    #[test]
    fn test_property_type_follows_schema() {
        let user_type = DataType::Record(user_schema());
        assert_eq!(property_type(&user_type, &path("id")), Some(DataType::Int));
        assert_eq!(property_type(&user_type, &path("address.city")), Some(DataType::String));
        assert_eq!(property_type(&user_type, &path("roles[0]")), Some(DataType::Any));
        assert_eq!(property_type(&user_type, &path("email")), None);
        assert!(!has_property(&DataType::Map, &path("anything")));
    }

    #[test]
    fn test_value_type_in_bindings() {
        let mut bindings = HashMap::new();
        bindings.insert("__frch_item_0".to_string(), user());
        bindings.insert("nothing".to_string(), Value::Null);

        assert_eq!(
            value_type_in(&bindings, &path("__frch_item_0.id")),
            Some(DataType::Int)
        );
        assert_eq!(value_type_in(&bindings, &path("nothing")), Some(DataType::Any));
        assert_eq!(value_type_in(&bindings, &path("missing")), None);
    }

    #[test]
    fn test_value_type_reports_declared_type_for_null_field() {
        let user = Value::Record(Record::new(user_schema()));
        assert_eq!(value_type_at(&user, &path("name")), Some(DataType::String));
    }
}
