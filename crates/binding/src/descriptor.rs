use crate::{
    error::{BindingError, Result},
    types::TypeHandler,
};
use model::core::{data_type::DataType, sql_type::SqlType};
use std::{fmt, str::FromStr, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterMode {
    #[default]
    In,
    Out,
    InOut,
}

impl ParameterMode {
    /// Whether a value is written into the statement for this parameter.
    pub fn is_input(&self) -> bool {
        !matches!(self, ParameterMode::Out)
    }

    pub fn is_output(&self) -> bool {
        !matches!(self, ParameterMode::In)
    }
}

impl FromStr for ParameterMode {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "IN" => Ok(ParameterMode::In),
            "OUT" => Ok(ParameterMode::Out),
            "INOUT" => Ok(ParameterMode::InOut),
            other => Err(BindingError::InvalidParameter {
                expression: s.to_string(),
                message: format!("unknown parameter mode '{other}'"),
            }),
        }
    }
}

/// One positional parameter of a bound template, in marker order.
#[derive(Clone)]
pub struct ParameterDescriptor {
    /// Property path or synthetic loop binding name.
    pub property: String,
    /// Declared or inferred value type; `Any` when unknown until bind time.
    pub data_type: DataType,
    pub sql_type: Option<SqlType>,
    pub sql_type_name: Option<String>,
    pub mode: ParameterMode,
    pub numeric_scale: Option<u32>,
    pub result_map_id: Option<String>,
    /// Explicit converter; otherwise one is picked when binding.
    pub type_handler: Option<Arc<dyn TypeHandler>>,
}

impl ParameterDescriptor {
    pub fn new(property: &str, data_type: DataType) -> Self {
        Self {
            property: property.to_string(),
            data_type,
            sql_type: None,
            sql_type_name: None,
            mode: ParameterMode::In,
            numeric_scale: None,
            result_map_id: None,
            type_handler: None,
        }
    }

    pub fn with_sql_type(mut self, sql_type: SqlType) -> Self {
        self.sql_type = Some(sql_type);
        self
    }

    pub fn with_mode(mut self, mode: ParameterMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_type_handler(mut self, handler: Arc<dyn TypeHandler>) -> Self {
        self.type_handler = Some(handler);
        self
    }
}

impl fmt::Debug for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterDescriptor")
            .field("property", &self.property)
            .field("data_type", &self.data_type)
            .field("sql_type", &self.sql_type)
            .field("mode", &self.mode)
            .field("numeric_scale", &self.numeric_scale)
            .field("type_handler", &self.type_handler.as_ref().map(|h| h.name()))
            .finish()
    }
}

impl fmt::Display for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.property)?;
        if let Some(sql_type) = self.sql_type {
            write!(f, ":{}", sql_type.name())?;
        }
        if self.mode != ParameterMode::In {
            write!(f, " ({:?})", self.mode)?;
        }
        Ok(())
    }
}
