//! Parser for the body of a `#{...}` placeholder:
//!
//! ```text
//! property[:SQLTYPE] (, name=value)*
//! ```

use crate::error::{BindingError, Result};

/// A placeholder body split into its property path and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterExpression {
    pub property: String,
    /// Attributes in the order written. The `:SQLTYPE` shorthand is reported
    /// as a `jdbcType` attribute.
    pub attributes: Vec<(String, String)>,
}

impl ParameterExpression {
    pub fn parse(expression: &str) -> Result<Self> {
        let body = expression.trim_start_matches(|c: char| c <= ' ');
        if body.starts_with('(') {
            return Err(BindingError::InvalidParameter {
                expression: expression.to_string(),
                message: "expression based parameters are not supported".to_string(),
            });
        }

        let end = body.find([',', ':']).unwrap_or(body.len());
        let property = body[..end].trim();
        if property.is_empty() {
            return Err(BindingError::InvalidParameter {
                expression: expression.to_string(),
                message: "missing property name".to_string(),
            });
        }

        let mut attributes = Vec::new();
        let mut rest = &body[end..];

        if let Some(after_colon) = rest.strip_prefix(':') {
            let end = after_colon.find(',').unwrap_or(after_colon.len());
            let sql_type = after_colon[..end].trim();
            if sql_type.is_empty() {
                return Err(BindingError::InvalidParameter {
                    expression: expression.to_string(),
                    message: "missing SQL type after ':'".to_string(),
                });
            }
            attributes.push(("jdbcType".to_string(), sql_type.to_string()));
            rest = &after_colon[end..];
        }

        while let Some(after_comma) = rest.strip_prefix(',') {
            let end = after_comma.find(',').unwrap_or(after_comma.len());
            let option = &after_comma[..end];
            let Some((name, value)) = option.split_once('=') else {
                return Err(BindingError::InvalidParameter {
                    expression: expression.to_string(),
                    message: format!("attribute '{}' has no value", option.trim()),
                });
            };
            attributes.push((name.trim().to_string(), value.trim().to_string()));
            rest = &after_comma[end..];
        }

        Ok(Self {
            property: property.to_string(),
            attributes,
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}
