use crate::{
    descriptor::ParameterDescriptor,
    dialect::Dialect,
    error::{BindingError, Result},
};
use model::core::value::Value;
use std::collections::HashMap;

/// Positional marker written in place of each named placeholder.
pub const MARKER: &str = "?";

/// Final SQL with positional markers, the matching parameter list and the
/// values bound while rendering.
///
/// Marker offsets are tracked so that literal `?` characters in the SQL
/// (e.g. PostgreSQL JSON operators) are never mistaken for parameters.
#[derive(Debug, Clone, Default)]
pub struct BoundTemplate {
    sql: String,
    markers: Vec<usize>,
    parameters: Vec<ParameterDescriptor>,
    bindings: HashMap<String, Value>,
}

impl BoundTemplate {
    pub(crate) fn from_parts(sql: String, markers: Vec<usize>, parameters: Vec<ParameterDescriptor>) -> Self {
        Self {
            sql,
            markers,
            parameters,
            bindings: HashMap::new(),
        }
    }

    pub fn with_bindings(mut self, bindings: HashMap<String, Value>) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub fn bindings(&self) -> &HashMap<String, Value> {
        &self.bindings
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Whether `name` (the root of a property path) was bound while rendering.
    pub fn has_binding(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Appends raw SQL text.
    pub fn push_sql(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Appends a marker together with the parameter it stands for.
    pub fn push_parameter(&mut self, parameter: ParameterDescriptor) {
        self.markers.push(self.sql.len());
        self.sql.push_str(MARKER);
        self.parameters.push(parameter);
    }

    pub fn bind_value(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    /// Fails unless there is exactly one parameter per marker.
    pub fn validate(&self) -> Result<()> {
        if self.markers.len() != self.parameters.len() {
            return Err(BindingError::MarkerMismatch {
                markers: self.markers.len(),
                parameters: self.parameters.len(),
            });
        }
        Ok(())
    }

    /// The SQL with each marker replaced by `dialect`'s placeholder.
    pub fn sql_for(&self, dialect: &dyn Dialect) -> String {
        let mut out = String::with_capacity(self.sql.len() + self.markers.len() * 2);
        let mut last = 0;
        for (index, &offset) in self.markers.iter().enumerate() {
            out.push_str(&self.sql[last..offset]);
            out.push_str(&dialect.get_placeholder(index));
            last = offset + MARKER.len();
        }
        out.push_str(&self.sql[last..]);
        out
    }
}
