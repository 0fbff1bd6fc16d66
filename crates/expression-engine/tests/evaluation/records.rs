use expression_engine::{Expression, ExpressionError, ValueContext, evaluate, evaluate_boolean};
use model::{
    ModelError,
    core::{
        data_type::DataType,
        record::{Record, RecordSchema},
        value::Value,
    },
};
use std::collections::HashMap;

fn author() -> Value {
    let schema = RecordSchema::builder("Author")
        .field("id", DataType::Int)
        .field("username", DataType::String)
        .field("email", DataType::String)
        .field("tags", DataType::List)
        .build();
    Value::Record(
        Record::new(schema)
            .with("id", 101i64)
            .unwrap()
            .with("username", "jim")
            .unwrap()
            .with("tags", vec![Value::from("a"), Value::from("b")])
            .unwrap(),
    )
}

#[test]
fn test_record_fields_resolve_as_names() {
    let author = author();
    let ctx = ValueContext(&author);

    assert!(evaluate_boolean("id == 101 and username != null", &ctx).unwrap());
    assert!(evaluate_boolean("email == null", &ctx).unwrap());
    assert_eq!(evaluate("tags.size()", &ctx).unwrap(), Value::Int(2));
}

#[test]
fn test_unknown_record_field_is_an_error() {
    let author = author();
    let ctx = ValueContext(&author);

    let err = evaluate("password != null", &ctx).unwrap_err();
    assert!(matches!(
        err,
        ExpressionError::Property(ModelError::NoSuchProperty { .. })
    ));
}

#[test]
fn test_nested_record_in_bindings() {
    let mut bindings = HashMap::new();
    bindings.insert("author".to_string(), author());

    let expr = Expression::parse("author.tags[0] == 'a' && author.id gt 100").unwrap();
    assert!(expr.evaluate_boolean(&bindings).unwrap());
}

#[test]
fn test_syntax_error_is_reported_before_evaluation() {
    let bindings: HashMap<String, Value> = HashMap::new();
    let err = evaluate("id = 1", &bindings).unwrap_err();
    assert!(err.is_syntax());
}
