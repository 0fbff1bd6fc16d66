use crate::{args, build};
use model::core::value::Value;
use template::{TemplateBuilder, render};
use tracing_test::traced_test;

const FIND_USERS: &str = r##"[
    "select * from users ",
    {"tag": "where", "children": [
        {"tag": "if", "attrs": {"test": "id != null"}, "children": ["AND id = #{id} "]},
        {"tag": "if", "attrs": {"test": "name != null and name != ''"}, "children": ["AND name = #{name} "]}
    ]}
]"##;

#[test]
#[traced_test]
fn where_strips_leading_and() {
    let tree = build(FIND_USERS);
    let out = render(&tree, &args(vec![("id", Value::Int(1))])).unwrap();
    assert_eq!(out.sql, "select * from users WHERE id = #{id} ");

    let out = render(&tree, &args(vec![("name", Value::from("x"))])).unwrap();
    assert_eq!(out.sql, "select * from users WHERE name = #{name} ");
}

#[test]
fn where_with_nothing_selected_renders_nothing() {
    let tree = build(FIND_USERS);
    let out = render(&tree, &args(vec![("name", Value::from(""))])).unwrap();
    assert_eq!(out.sql, "select * from users ");
}

#[test]
fn set_strips_trailing_comma() {
    let tree = build(
        r##"["update users ",
            {"tag": "set", "children": [
                {"tag": "if", "attrs": {"test": "name != null"}, "children": ["name = #{name}, "]},
                {"tag": "if", "attrs": {"test": "age != null"}, "children": ["age = #{age}, "]}
            ]},
            "where id = #{id}"]"##,
    );
    let out = render(&tree, &args(vec![("name", Value::from("n")), ("id", Value::Int(1))])).unwrap();
    assert_eq!(out.sql, "update users SET name = #{name} where id = #{id}");
}

#[test]
#[traced_test]
fn choose_renders_first_matching_branch() {
    let tree = build(
        r##"[{"tag": "choose", "children": [
            {"tag": "when", "attrs": {"test": "a"}, "children": ["A"]},
            {"tag": "when", "attrs": {"test": "b"}, "children": ["B"]},
            {"tag": "when", "attrs": {"test": "c"}, "children": ["C"]},
            {"tag": "otherwise", "children": ["D"]}
        ]}]"##,
    );
    let flags = |a, b, c| {
        args(vec![
            ("a", Value::Boolean(a)),
            ("b", Value::Boolean(b)),
            ("c", Value::Boolean(c)),
        ])
    };

    assert_eq!(render(&tree, &flags(false, true, false)).unwrap().sql, "B");
    assert_eq!(render(&tree, &flags(true, true, true)).unwrap().sql, "A");
    assert_eq!(render(&tree, &flags(false, false, false)).unwrap().sql, "D");
}

#[test]
fn bind_is_visible_to_later_siblings() {
    let tree = build(
        r##"[{"tag": "bind", "attrs": {"name": "pattern", "value": "'%' + name + '%'"}},
            "select * from users where name like #{pattern}",
            {"tag": "if", "attrs": {"test": "pattern.length() > 3"}, "children": [" limit 10"]}]"##,
    );
    let out = render(&tree, &args(vec![("name", Value::from("bob"))])).unwrap();
    assert_eq!(out.sql, "select * from users where name like #{pattern} limit 10");
    assert_eq!(out.bindings["pattern"], Value::from("%bob%"));
}

#[test]
fn bind_inside_loop_writes_outer_bindings() {
    let tree = build(
        r##"[{"tag": "foreach", "attrs": {"collection": "ids", "item": "id"},
             "children": [{"tag": "bind", "attrs": {"name": "last", "value": "id"}}]},
            "#{last}"]"##,
    );
    let ids = Value::List(vec![Value::Int(1), Value::Int(2)]);
    let out = render(&tree, &args(vec![("ids", ids)])).unwrap();
    assert_eq!(out.sql, "#{last}");
    assert_eq!(out.bindings["last"], Value::Int(2));
}

#[test]
fn static_template_renders_verbatim() {
    let tree = build(r##"["SELECT * FROM t\n  WHERE id = #{id} AND name = #{name}"]"##);
    assert!(!tree.is_dynamic());

    let first = render(&tree, &Value::Int(1)).unwrap();
    let second = render(&tree, &args(vec![("id", Value::Int(2))])).unwrap();
    assert_eq!(first.sql, "SELECT * FROM t\n  WHERE id = #{id} AND name = #{name}");
    assert_eq!(first.sql, second.sql);
}

#[test]
fn database_id_is_visible_to_conditions() {
    let body = serde_json::from_str::<Vec<template::ElementDescriptor>>(
        r##"[{"tag": "if", "attrs": {"test": "_databaseId == 'postgres'"}, "children": ["ILIKE"]},
            {"tag": "if", "attrs": {"test": "_databaseId != 'postgres'"}, "children": ["LIKE"]}]"##,
    )
    .unwrap();
    let tree = TemplateBuilder::new().build(&body).unwrap();
    let argument = Value::Null;

    let ctx = template::RenderingContext::new(&argument).with_database_id(Some("postgres"));
    assert_eq!(template::render_with(&tree, ctx).unwrap().sql, "ILIKE");
    assert_eq!(render(&tree, &argument).unwrap().sql, "LIKE");
}
