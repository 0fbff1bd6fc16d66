use crate::types::handler::{CoercingHandler, ObjectHandler, TypeHandler};
use lazy_static::lazy_static;
use model::core::{data_type::DataType, sql_type::SqlType};
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

lazy_static! {
    static ref DEFAULT_REGISTRY: TypeHandlerRegistry = TypeHandlerRegistry::with_defaults();
}

/// Type handlers by value type and SQL type, plus handlers registered by
/// name for explicit `typeHandler=` references.
///
/// Built once, then shared read-only.
#[derive(Debug, Clone)]
pub struct TypeHandlerRegistry {
    by_type: HashMap<DataType, HashMap<Option<SqlType>, Arc<dyn TypeHandler>>>,
    by_sql_type: HashMap<SqlType, Arc<dyn TypeHandler>>,
    by_name: HashMap<String, Arc<dyn TypeHandler>>,
    generic: Arc<dyn TypeHandler>,
}

impl Default for TypeHandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl TypeHandlerRegistry {
    /// A registry with nothing but the pass-through handler.
    pub fn empty() -> Self {
        Self {
            by_type: HashMap::new(),
            by_sql_type: HashMap::new(),
            by_name: HashMap::new(),
            generic: Arc::new(ObjectHandler),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();

        for data_type in [
            DataType::Boolean,
            DataType::SmallInt,
            DataType::Int32,
            DataType::Int,
            DataType::Float,
            DataType::Decimal,
            DataType::String,
            DataType::Bytes,
            DataType::Uuid,
            DataType::Date,
            DataType::Timestamp,
            DataType::TimestampNaive,
        ] {
            let handler: Arc<dyn TypeHandler> = Arc::new(CoercingHandler::new(data_type.clone()));
            registry.register(data_type, None, handler);
        }

        // JSON values stay navigable as arguments, so they only get a
        // handler by SQL type and by name.
        let json: Arc<dyn TypeHandler> = Arc::new(CoercingHandler::new(DataType::Json));
        registry.register_named(json.name().to_string(), json.clone());
        registry.register_sql_type(SqlType::Json, json);

        for (sql_type, data_type) in SQL_TYPE_TARGETS {
            if let Some(handler) = registry.get(data_type, None) {
                registry.register_sql_type(*sql_type, handler);
            }
        }

        let generic = registry.generic.clone();
        registry.register_named(generic.name().to_string(), generic);

        debug!(
            "Type handler registry ready: {} types, {} SQL types",
            registry.by_type.len(),
            registry.by_sql_type.len()
        );
        registry
    }

    pub fn global() -> &'static TypeHandlerRegistry {
        &DEFAULT_REGISTRY
    }

    /// Registers `handler` for values of `data_type`, optionally only when
    /// the declared SQL type is `sql_type`. The handler is also reachable by
    /// its name.
    pub fn register(&mut self, data_type: DataType, sql_type: Option<SqlType>, handler: Arc<dyn TypeHandler>) {
        self.by_name
            .entry(handler.name().to_string())
            .or_insert_with(|| handler.clone());
        self.by_type
            .entry(data_type)
            .or_default()
            .insert(sql_type, handler);
    }

    pub fn register_sql_type(&mut self, sql_type: SqlType, handler: Arc<dyn TypeHandler>) {
        self.by_sql_type.insert(sql_type, handler);
    }

    pub fn register_named(&mut self, name: impl Into<String>, handler: Arc<dyn TypeHandler>) {
        self.by_name.insert(name.into(), handler);
    }

    /// Handler for `data_type`: the one registered for `sql_type` if any,
    /// then the type's default, then its only handler.
    pub fn get(&self, data_type: &DataType, sql_type: Option<SqlType>) -> Option<Arc<dyn TypeHandler>> {
        let handlers = self.by_type.get(data_type)?;
        handlers
            .get(&sql_type)
            .or_else(|| handlers.get(&None))
            .or_else(|| {
                let mut only = handlers.values();
                match (only.next(), only.next()) {
                    (Some(handler), None) => Some(handler),
                    _ => None,
                }
            })
            .cloned()
    }

    pub fn for_sql_type(&self, sql_type: SqlType) -> Option<Arc<dyn TypeHandler>> {
        self.by_sql_type.get(&sql_type).cloned()
    }

    pub fn named(&self, name: &str) -> Option<Arc<dyn TypeHandler>> {
        self.by_name.get(name).cloned()
    }

    /// Whether values of `data_type` are bound as a whole rather than
    /// navigated into.
    pub fn has_direct_converter(&self, data_type: &DataType) -> bool {
        self.by_type.contains_key(data_type)
    }

    pub fn generic(&self) -> Arc<dyn TypeHandler> {
        self.generic.clone()
    }
}

const SQL_TYPE_TARGETS: &[(SqlType, DataType)] = &[
    (SqlType::Bit, DataType::Boolean),
    (SqlType::Boolean, DataType::Boolean),
    (SqlType::TinyInt, DataType::SmallInt),
    (SqlType::SmallInt, DataType::SmallInt),
    (SqlType::Integer, DataType::Int32),
    (SqlType::BigInt, DataType::Int),
    (SqlType::Float, DataType::Float),
    (SqlType::Real, DataType::Float),
    (SqlType::Double, DataType::Float),
    (SqlType::Numeric, DataType::Decimal),
    (SqlType::Decimal, DataType::Decimal),
    (SqlType::Char, DataType::String),
    (SqlType::VarChar, DataType::String),
    (SqlType::LongVarChar, DataType::String),
    (SqlType::NVarChar, DataType::String),
    (SqlType::Clob, DataType::String),
    (SqlType::Date, DataType::Date),
    (SqlType::Timestamp, DataType::TimestampNaive),
    (SqlType::TimestampWithTimezone, DataType::Timestamp),
    (SqlType::Binary, DataType::Bytes),
    (SqlType::VarBinary, DataType::Bytes),
    (SqlType::LongVarBinary, DataType::Bytes),
    (SqlType::Blob, DataType::Bytes),
];
