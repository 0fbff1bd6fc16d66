mod clauses;
mod loops;

use model::core::value::Value;
use std::collections::BTreeMap;
use template::{ElementDescriptor, TemplateBuilder, TemplateNode};

pub fn build(json: &str) -> TemplateNode {
    let body: Vec<ElementDescriptor> = serde_json::from_str(json).unwrap();
    TemplateBuilder::new().build(&body).unwrap()
}

pub fn args(pairs: Vec<(&str, Value)>) -> Value {
    Value::Map(
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>(),
    )
}
