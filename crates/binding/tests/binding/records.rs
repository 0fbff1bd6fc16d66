use crate::run;
use model::core::{data_type::DataType, record::{Record, RecordSchema}, value::Value};

fn user() -> Value {
    let schema = RecordSchema::builder("User")
        .field("id", DataType::Int)
        .field("email", DataType::String)
        .field("age", DataType::Int32)
        .build();
    Value::Record(
        Record::new(schema)
            .with("id", 10i64)
            .unwrap()
            .with("email", "a@b.c")
            .unwrap(),
    )
}

#[test]
fn record_fields_bind_with_declared_types() {
    let (bound, stmt) = run(
        r#"["update users set email = #{email}, age = #{age} where id = #{id}"]"#,
        &user(),
    );

    let types: Vec<_> = bound.parameters().iter().map(|p| p.data_type.clone()).collect();
    assert_eq!(types, vec![DataType::String, DataType::Int32, DataType::Int]);
    assert_eq!(
        stmt.values(),
        vec![Value::from("a@b.c"), Value::Null, Value::Int(10)]
    );
}

#[test]
fn single_scalar_argument_fills_every_placeholder() {
    let (bound, stmt) = run(r#"["select * from users where id = #{id} or parent = #{anything}"]"#, &Value::Int(3));
    assert_eq!(bound.parameters().len(), 2);
    assert_eq!(stmt.values(), vec![Value::Int(3), Value::Int(3)]);
}

#[test]
fn null_argument_binds_nulls() {
    let (_, stmt) = run(r#"["select #{a}, #{b.c}"]"#, &Value::Null);
    assert_eq!(stmt.values(), vec![Value::Null, Value::Null]);
}
