mod pipeline;
mod records;

use binding::{BoundTemplate, ParamStore, ParameterBinder, PlaceholderResolver, TypeAliasRegistry, TypeHandlerRegistry};
use model::core::{sql_type::SqlType, value::Value};
use std::{collections::BTreeMap, sync::Arc};
use template::{ElementDescriptor, TemplateBuilder, render};

/// Renders, resolves and binds `body` against `argument`.
pub fn run(body: &str, argument: &Value) -> (BoundTemplate, ParamStore) {
    let body: Vec<ElementDescriptor> = serde_json::from_str(body).unwrap();
    let tree = TemplateBuilder::new().build(&body).unwrap();
    let rendered = render(&tree, argument).unwrap();

    let aliases = TypeAliasRegistry::new();
    let bound = PlaceholderResolver::new(TypeHandlerRegistry::global(), &aliases)
        .resolve(&rendered.sql, &argument.data_type(), &rendered.bindings)
        .unwrap()
        .with_bindings(rendered.bindings);

    let binder = ParameterBinder::new(Arc::new(TypeHandlerRegistry::with_defaults()), SqlType::Other);
    let mut stmt = ParamStore::new();
    binder.bind(&mut stmt, &bound, argument).unwrap();
    (bound, stmt)
}

pub fn map(pairs: Vec<(&str, Value)>) -> Value {
    Value::Map(
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>(),
    )
}
