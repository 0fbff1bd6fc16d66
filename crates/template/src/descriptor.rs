use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node of a statement body as written in a mapper document: either a
/// run of SQL text or an element such as `if`, `foreach` or `where`.
///
/// ```json
/// ["select * from users",
///  { "tag": "where", "children": [
///      { "tag": "if", "attrs": { "test": "id != null" }, "children": ["AND id = #{id}"] }
///  ]}]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementDescriptor {
    Text(String),
    Element {
        tag: String,
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<ElementDescriptor>,
    },
}

impl ElementDescriptor {
    pub fn text(text: impl Into<String>) -> Self {
        ElementDescriptor::Text(text.into())
    }

    pub fn element(tag: &str, attrs: &[(&str, &str)], children: Vec<ElementDescriptor>) -> Self {
        ElementDescriptor::Element {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            children,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            ElementDescriptor::Element { tag, .. } => Some(tag),
            ElementDescriptor::Text(_) => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            ElementDescriptor::Element { attrs, .. } => attrs.get(name).map(String::as_str),
            ElementDescriptor::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[ElementDescriptor] {
        match self {
            ElementDescriptor::Element { children, .. } => children,
            ElementDescriptor::Text(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_body() {
        let body: Vec<ElementDescriptor> = serde_json::from_str(
            r#"["select * from t",
                {"tag": "where", "children": [
                    {"tag": "if", "attrs": {"test": "id != null"}, "children": ["AND id = #{id}"]}
                ]},
                {"tag": "bind", "attrs": {"name": "x", "value": "1"}}]"#,
        )
        .unwrap();

        assert_eq!(body.len(), 3);
        assert_eq!(body[0], ElementDescriptor::text("select * from t"));
        assert_eq!(body[1].tag(), Some("where"));
        assert_eq!(body[1].children()[0].attr("test"), Some("id != null"));
        assert!(body[2].children().is_empty());
    }
}
