use crate::{map, run};
use binding::Postgres;
use model::core::value::Value;
use tracing_test::traced_test;

#[test]
#[traced_test]
fn named_placeholders_become_positional() {
    let argument = map(vec![("id", Value::Int(7)), ("name", Value::from("x"))]);
    let (bound, stmt) = run(
        r##"["SELECT * FROM t WHERE id = #{id} AND name = #{name}"]"##,
        &argument,
    );

    assert_eq!(bound.sql(), "SELECT * FROM t WHERE id = ? AND name = ?");
    let names: Vec<_> = bound.parameters().iter().map(|p| p.property.as_str()).collect();
    assert_eq!(names, vec!["id", "name"]);
    assert_eq!(stmt.values(), vec![Value::Int(7), Value::from("x")]);
}

#[test]
#[traced_test]
fn loop_values_bind_in_order() {
    let argument = map(vec![
        ("status", Value::from("open")),
        ("ids", Value::List(vec![Value::Int(4), Value::Int(5), Value::Int(6)])),
    ]);
    let (bound, stmt) = run(
        r##"["select * from orders where status = #{status} and id in ",
            {"tag": "foreach",
             "attrs": {"collection": "ids", "item": "id", "open": "(", "close": ")", "separator": ", "},
             "children": ["#{id}"]},
            " order by id"]"##,
        &argument,
    );

    assert_eq!(
        bound.sql(),
        "select * from orders where status = ? and id in (?, ?, ?) order by id"
    );
    assert_eq!(bound.marker_count(), bound.parameters().len());
    assert_eq!(
        stmt.values(),
        vec![Value::from("open"), Value::Int(4), Value::Int(5), Value::Int(6)]
    );
    assert_eq!(
        bound.sql_for(&Postgres),
        "select * from orders where status = $1 and id in ($2, $3, $4) order by id"
    );
}

#[test]
fn loop_over_records_navigates_item_paths() {
    let row = |id: i64, name: &str| map(vec![("id", Value::Int(id)), ("name", Value::from(name))]);
    let argument = map(vec![("rows", Value::List(vec![row(1, "a"), row(2, "b")]))]);
    let (bound, stmt) = run(
        r##"["insert into t (id, name) values ",
            {"tag": "foreach", "attrs": {"collection": "rows", "item": "r", "separator": ","},
             "children": ["(#{r.id}, #{r.name, jdbcType=VARCHAR})"]}]"##,
        &argument,
    );

    assert_eq!(bound.sql(), "insert into t (id, name) values (?, ?),(?, ?)");
    assert_eq!(
        stmt.values(),
        vec![Value::Int(1), Value::from("a"), Value::Int(2), Value::from("b")]
    );
    assert_eq!(bound.parameters()[1].property, "__frch_r_0.name");
}

#[test]
fn bind_element_values_reach_the_statement() {
    let argument = map(vec![("name", Value::from("bo"))]);
    let (bound, stmt) = run(
        r##"[{"tag": "bind", "attrs": {"name": "pattern", "value": "'%' + name + '%'"}},
            "select * from users where name like #{pattern}"]"##,
        &argument,
    );
    assert_eq!(bound.sql(), "select * from users where name like ?");
    assert_eq!(stmt.values(), vec![Value::from("%bo%")]);
}

#[test]
fn dynamic_statements_resolve_per_argument() {
    let body = r##"["select * from users ",
        {"tag": "where", "children": [
            {"tag": "if", "attrs": {"test": "id != null"}, "children": [" AND id = #{id}"]},
            {"tag": "if", "attrs": {"test": "email != null"}, "children": [" AND email = #{email}"]}
        ]}]"##;

    let (bound, _) = run(body, &map(vec![("id", Value::Int(1))]));
    assert_eq!(bound.sql(), "select * from users WHERE id = ?");
    assert_eq!(bound.parameters().len(), 1);

    let (bound, stmt) = run(
        body,
        &map(vec![("id", Value::Int(1)), ("email", Value::from("e@x"))]),
    );
    assert_eq!(bound.sql(), "select * from users WHERE id = ? AND email = ?");
    assert_eq!(stmt.len(), 2);
}
