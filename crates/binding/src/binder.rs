use crate::{
    bound::BoundTemplate,
    descriptor::ParameterDescriptor,
    error::{BindingError, Result},
    statement::Statement,
    types::{TypeHandler, TypeHandlerRegistry},
};
use model::{
    core::{data_type::DataType, sql_type::SqlType, value::Value},
    meta::{PropertyPath, get_path, get_path_in, set_path},
};
use std::{
    borrow::Cow,
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::{debug, trace};

// Runtime value type, declared type, effective SQL type.
type HandlerKey = (DataType, DataType, Option<SqlType>);

/// Writes the values a bound template asks for into a statement.
///
/// Handlers picked for a property are cached per property name, value type
/// and declared types; the cache is shared by every thread binding through
/// this binder.
pub struct ParameterBinder {
    handlers: Arc<TypeHandlerRegistry>,
    jdbc_type_for_null: SqlType,
    cache: RwLock<HashMap<String, HashMap<HandlerKey, Arc<dyn TypeHandler>>>>,
}

impl ParameterBinder {
    pub fn new(handlers: Arc<TypeHandlerRegistry>, jdbc_type_for_null: SqlType) -> Self {
        Self {
            handlers,
            jdbc_type_for_null,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn handlers(&self) -> &TypeHandlerRegistry {
        &self.handlers
    }

    /// Binds every input parameter in marker order and registers output
    /// parameters. The first failure aborts the whole bind.
    pub fn bind(&self, stmt: &mut dyn Statement, bound: &BoundTemplate, argument: &Value) -> Result<()> {
        bound.validate()?;
        let argument = navigable(argument);
        debug!("Binding {} parameters", bound.parameters().len());

        for (index, param) in bound.parameters().iter().enumerate() {
            let ordinal = index + 1;

            if param.mode.is_output() {
                self.register_output(stmt, ordinal, param)?;
            }
            if !param.mode.is_input() {
                continue;
            }

            let value = self.resolve_value(param, bound, &argument)?;
            let sql_type = match param.sql_type {
                None if value.is_null() => Some(self.jdbc_type_for_null),
                declared => declared,
            };
            let handler = self.select_handler(param, &value, sql_type);
            trace!("==> #{} {} = {} ({})", ordinal, param.property, value, handler.name());

            handler
                .set_parameter(stmt, ordinal, value, sql_type)
                .map_err(|err| err.for_parameter(&param.property, ordinal, handler.name()))?;
        }
        Ok(())
    }

    /// Copies output parameter values from an executed statement back into
    /// `argument` at each parameter's property path.
    pub fn apply_outputs(&self, stmt: &dyn Statement, bound: &BoundTemplate, argument: &mut Value) -> Result<()> {
        for (index, param) in bound.parameters().iter().enumerate() {
            if !param.mode.is_output() {
                continue;
            }
            let ordinal = index + 1;
            let value = stmt.output(ordinal).ok_or(BindingError::MissingOutput {
                ordinal,
                sql_type: param.sql_type,
            })?;

            let handler = self.output_handler(param);
            let value = handler
                .get_result(value)
                .map_err(|err| err.for_parameter(&param.property, ordinal, handler.name()))?;

            let path = parse_path(&param.property)?;
            set_path(argument, &path, value).map_err(|source| BindingError::Property {
                property: param.property.clone(),
                source,
            })?;
        }
        Ok(())
    }

    fn register_output(&self, stmt: &mut dyn Statement, ordinal: usize, param: &ParameterDescriptor) -> Result<()> {
        let sql_type = param.sql_type.ok_or_else(|| BindingError::InvalidParameter {
            expression: param.property.clone(),
            message: "output parameters require a jdbcType".to_string(),
        })?;
        stmt.register_out_parameter(ordinal, sql_type, param.numeric_scale, param.sql_type_name.as_deref())
    }

    /// Values bound while rendering win; a null argument gives null; an
    /// argument with its own handler is the value; otherwise the property
    /// path is read off the argument.
    fn resolve_value(&self, param: &ParameterDescriptor, bound: &BoundTemplate, argument: &Value) -> Result<Value> {
        let path = parse_path(&param.property)?;
        let read = if bound.has_binding(path.root()) {
            get_path_in(bound.bindings(), &path)
        } else if argument.is_null() {
            Ok(Value::Null)
        } else if self.handlers.has_direct_converter(&argument.data_type()) {
            Ok(argument.clone())
        } else {
            get_path(argument, &path)
        };

        read.map_err(|source| BindingError::Property {
            property: param.property.clone(),
            source,
        })
    }

    /// Explicit handler first. Otherwise the value's runtime type, then the
    /// parameter's declared type, then the SQL type alone, then pass-through.
    fn select_handler(
        &self,
        param: &ParameterDescriptor,
        value: &Value,
        sql_type: Option<SqlType>,
    ) -> Arc<dyn TypeHandler> {
        if let Some(handler) = &param.type_handler {
            return handler.clone();
        }

        let key = (value.data_type(), param.data_type.clone(), sql_type);
        if let Some(handler) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&param.property)
            .and_then(|by_type| by_type.get(&key))
        {
            return handler.clone();
        }

        let specific = |data_type: &DataType| {
            self.handlers
                .get(data_type, sql_type)
                .filter(|handler| !handler.is_generic())
        };
        let handler = specific(&key.0)
            .or_else(|| specific(&key.1))
            .or_else(|| sql_type.and_then(|t| self.handlers.for_sql_type(t)))
            .unwrap_or_else(|| self.handlers.generic());

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache
            .entry(param.property.clone())
            .or_default()
            .entry(key)
            .or_insert(handler)
            .clone()
    }

    /// Output values arrive untyped, so the declared types decide.
    fn output_handler(&self, param: &ParameterDescriptor) -> Arc<dyn TypeHandler> {
        if let Some(handler) = &param.type_handler {
            return handler.clone();
        }
        self.handlers
            .get(&param.data_type, param.sql_type)
            .or_else(|| param.sql_type.and_then(|t| self.handlers.for_sql_type(t)))
            .unwrap_or_else(|| self.handlers.generic())
    }

    pub fn cached_handler_count(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(HashMap::len)
            .sum()
    }
}

fn parse_path(property: &str) -> Result<PropertyPath> {
    PropertyPath::parse(property).map_err(|source| BindingError::Property {
        property: property.to_string(),
        source,
    })
}

/// JSON arguments are read through the value model.
fn navigable(argument: &Value) -> Cow<'_, Value> {
    match argument {
        Value::Json(json @ (serde_json::Value::Object(_) | serde_json::Value::Array(_))) => {
            Cow::Owned(Value::from_json(json.clone()))
        }
        other => Cow::Borrowed(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        descriptor::ParameterMode,
        statement::ParamStore,
        types::{CoercingHandler, TypeAliasRegistry},
        resolver::PlaceholderResolver,
    };
    use std::collections::BTreeMap;

    fn binder() -> ParameterBinder {
        ParameterBinder::new(Arc::new(TypeHandlerRegistry::with_defaults()), SqlType::Other)
    }

    fn binder_with(registry: TypeHandlerRegistry) -> ParameterBinder {
        ParameterBinder::new(Arc::new(registry), SqlType::Other)
    }

    fn bind_one(binder: &ParameterBinder, sql: &str, value: Value) -> Value {
        let argument = map(&[("v", value)]);
        let bound = resolve(sql, &argument, HashMap::new());
        let mut stmt = ParamStore::new();
        binder.bind(&mut stmt, &bound, &argument).unwrap();
        stmt.values().remove(0)
    }

    fn resolve(sql: &str, argument: &Value, bindings: HashMap<String, Value>) -> BoundTemplate {
        let handlers = TypeHandlerRegistry::global();
        let aliases = TypeAliasRegistry::new();
        PlaceholderResolver::new(handlers, &aliases)
            .resolve(sql, &argument.data_type(), &bindings)
            .unwrap()
            .with_bindings(bindings)
    }

    fn map(pairs: &[(&str, Value)]) -> Value {
        Value::Map(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn test_binds_in_marker_order() {
        let argument = map(&[("id", Value::Int(7)), ("name", Value::from("x"))]);
        let bound = resolve("WHERE id = #{id} AND name = #{name}", &argument, HashMap::new());
        let mut stmt = ParamStore::new();
        binder().bind(&mut stmt, &bound, &argument).unwrap();
        assert_eq!(stmt.values(), vec![Value::Int(7), Value::from("x")]);
    }

    #[test]
    fn test_scalar_argument_is_the_value() {
        let argument = Value::Int(5);
        let bound = resolve("#{id} #{other}", &argument, HashMap::new());
        let mut stmt = ParamStore::new();
        binder().bind(&mut stmt, &bound, &argument).unwrap();
        assert_eq!(stmt.values(), vec![Value::Int(5), Value::Int(5)]);
    }

    #[test]
    fn test_null_gets_default_sql_type() {
        let argument = map(&[]);
        let bound = resolve("#{missing} #{typed, jdbcType=VARCHAR}", &argument, HashMap::new());
        let mut stmt = ParamStore::new();
        binder().bind(&mut stmt, &bound, &argument).unwrap();
        assert_eq!(stmt.params[&1].sql_type, Some(SqlType::Other));
        assert_eq!(stmt.params[&2].sql_type, Some(SqlType::VarChar));
        assert_eq!(stmt.values(), vec![Value::Null, Value::Null]);
    }

    #[test]
    fn test_bindings_shadow_argument() {
        let argument = map(&[("id", Value::Int(1))]);
        let mut bindings = HashMap::new();
        bindings.insert("id".to_string(), Value::Int(2));
        let bound = resolve("#{id}", &argument, bindings);
        let mut stmt = ParamStore::new();
        binder().bind(&mut stmt, &bound, &argument).unwrap();
        assert_eq!(stmt.values(), vec![Value::Int(2)]);
    }

    #[test]
    fn test_runtime_type_wins_over_declared_type() {
        let argument = map(&[("age", Value::from("41"))]);
        let bound = resolve("#{age, javaType=int}", &argument, HashMap::new());
        let mut stmt = ParamStore::new();
        binder().bind(&mut stmt, &bound, &argument).unwrap();
        assert_eq!(stmt.values(), vec![Value::from("41")]);

        let bound = resolve("#{age, typeHandler=intHandler}", &argument, HashMap::new());
        let mut stmt = ParamStore::new();
        binder().bind(&mut stmt, &bound, &argument).unwrap();
        assert_eq!(stmt.values(), vec![Value::Int32(41)]);
    }

    #[test]
    fn test_conversion_failure_names_the_parameter() {
        let argument = map(&[("age", Value::from("old"))]);
        let bound = resolve("#{id} #{age, typeHandler=intHandler}", &argument, HashMap::new());
        let mut stmt = ParamStore::new();
        let err = binder().bind(&mut stmt, &bound, &argument).unwrap_err();
        match err {
            BindingError::Conversion { property, ordinal, handler, .. } => {
                assert_eq!(property, "age");
                assert_eq!(ordinal, 2);
                assert_eq!(handler, "intHandler");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_value_type_falls_back_to_sql_type_then_generic() {
        let argument = map(&[("tags", Value::List(vec![Value::from("a")]))]);
        let bound = resolve("#{tags} #{tags, jdbcType=JSON}", &argument, HashMap::new());
        let mut stmt = ParamStore::new();
        binder().bind(&mut stmt, &bound, &argument).unwrap();
        assert_eq!(stmt.values()[0], Value::List(vec![Value::from("a")]));
        assert_eq!(stmt.values()[1], Value::Json(serde_json::json!(["a"])));
    }

    #[test]
    fn test_handler_cache_is_per_property_and_type() {
        let binder = binder();
        let bound = resolve("#{v}", &map(&[]), HashMap::new());
        for value in [Value::Int(1), Value::Int(2), Value::from("s")] {
            let mut stmt = ParamStore::new();
            binder.bind(&mut stmt, &bound, &map(&[("v", value)])).unwrap();
        }
        assert_eq!(binder.cached_handler_count(), 2);
    }

    #[test]
    fn test_output_parameters() {
        let mut argument = map(&[("id", Value::Int(3))]);
        let bound = resolve(
            "{call total(#{id}, #{total, mode=OUT, jdbcType=NUMERIC, numericScale=2})}",
            &argument,
            HashMap::new(),
        );
        let mut stmt = ParamStore::new();
        let binder = binder();
        binder.bind(&mut stmt, &bound, &argument).unwrap();

        assert_eq!(stmt.values(), vec![Value::Int(3)]);
        assert_eq!(stmt.outputs[&2].sql_type, SqlType::Numeric);
        assert_eq!(stmt.outputs[&2].numeric_scale, Some(2));
        assert_eq!(bound.parameters()[1].mode, ParameterMode::Out);

        stmt.set_result(2, Value::from("12.50"));
        binder.apply_outputs(&stmt, &bound, &mut argument).unwrap();
        assert_eq!(
            get_path(&argument, &PropertyPath::parse("total").unwrap()).unwrap(),
            Value::Decimal("12.50".parse().unwrap())
        );
    }

    #[test]
    fn test_output_without_sql_type_is_rejected() {
        let argument = map(&[]);
        let bound = resolve("#{x, mode=OUT}", &argument, HashMap::new());
        let mut stmt = ParamStore::new();
        assert!(binder().bind(&mut stmt, &bound, &argument).is_err());
    }

    #[test]
    fn test_custom_handler_on_descriptor() {
        let argument = map(&[("flag", Value::Int(1))]);
        let mut bound = BoundTemplate::default();
        bound.push_sql("x = ");
        bound.push_parameter(
            ParameterDescriptor::new("flag", DataType::Any)
                .with_type_handler(Arc::new(CoercingHandler::new(DataType::Boolean))),
        );
        let mut stmt = ParamStore::new();
        binder().bind(&mut stmt, &bound, &argument).unwrap();
        assert_eq!(stmt.values(), vec![Value::Boolean(true)]);
    }

    #[test]
    fn test_cached_handler_does_not_hide_declared_type() {
        let binder = binder();
        let json = Value::Json(serde_json::json!("abc"));
        assert_eq!(bind_one(&binder, "#{v}", json.clone()), json);
        assert_eq!(bind_one(&binder, "#{v, javaType=string}", json), Value::from("abc"));
        assert_eq!(binder.cached_handler_count(), 2);
    }

    #[test]
    fn test_fallback_runtime_type_first() {
        let mut registry = TypeHandlerRegistry::empty();
        registry.register(DataType::Int32, None, Arc::new(CoercingHandler::new(DataType::Int32)));
        registry.register(DataType::String, None, Arc::new(CoercingHandler::new(DataType::String)));
        let binder = binder_with(registry);
        assert_eq!(bind_one(&binder, "#{v, javaType=string}", Value::Int32(7)), Value::Int32(7));
    }

    #[test]
    fn test_fallback_declared_type_when_runtime_type_unknown() {
        let mut registry = TypeHandlerRegistry::empty();
        registry.register(DataType::String, None, Arc::new(CoercingHandler::new(DataType::String)));
        let binder = binder_with(registry);
        assert_eq!(bind_one(&binder, "#{v, javaType=string}", Value::Int(7)), Value::from("7"));
    }

    #[test]
    fn test_fallback_sql_type_when_no_type_handler() {
        let mut registry = TypeHandlerRegistry::empty();
        registry.register_sql_type(SqlType::VarChar, Arc::new(CoercingHandler::new(DataType::String)));
        let binder = binder_with(registry);
        assert_eq!(bind_one(&binder, "#{v, jdbcType=VARCHAR}", Value::Int(7)), Value::from("7"));
        assert_eq!(
            bind_one(&binder, "#{v, javaType=int, jdbcType=VARCHAR}", Value::Int(7)),
            Value::from("7")
        );
    }

    #[test]
    fn test_fallback_generic_handler_last() {
        let binder = binder_with(TypeHandlerRegistry::empty());
        assert_eq!(bind_one(&binder, "#{v, javaType=string}", Value::Int(7)), Value::Int(7));
        assert_eq!(bind_one(&binder, "#{v, jdbcType=INTEGER}", Value::Int(7)), Value::Int(7));
    }
}
