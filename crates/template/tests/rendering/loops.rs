use crate::{args, build};
use model::core::value::Value;
use template::render;
use tracing_test::traced_test;

const IN_CLAUSE: &str = r##"[
    "select * from t where id in ",
    {"tag": "foreach",
     "attrs": {"collection": "ids", "item": "id", "open": "(", "close": ")", "separator": ","},
     "children": ["#{id}"]}
]"##;

fn list(values: &[i64]) -> Value {
    Value::List(values.iter().copied().map(Value::Int).collect())
}

#[test]
#[traced_test]
fn empty_collection_renders_nothing() {
    let tree = build(IN_CLAUSE);
    let out = render(&tree, &args(vec![("ids", list(&[]))])).unwrap();
    assert_eq!(out.sql, "select * from t where id in ");
}

#[test]
#[traced_test]
fn separators_only_between_elements() {
    let tree = build(IN_CLAUSE);
    let out = render(&tree, &args(vec![("ids", list(&[1, 2, 3]))])).unwrap();
    assert_eq!(out.sql.matches(',').count(), 2);
    assert_eq!(
        out.sql,
        "select * from t where id in (#{__frch_id_0},#{__frch_id_1},#{__frch_id_2})"
    );
    assert_eq!(out.bindings["__frch_id_0"], Value::Int(1));
    assert_eq!(out.bindings["__frch_id_2"], Value::Int(3));
}

#[test]
fn skipped_iterations_do_not_leave_separators() {
    let tree = build(
        r##"[{"tag": "foreach",
             "attrs": {"collection": "ids", "item": "id", "separator": " OR "},
             "children": [{"tag": "if", "attrs": {"test": "id > 1"}, "children": ["x = #{id}"]}]}]"##,
    );
    let out = render(&tree, &args(vec![("ids", list(&[1, 2, 3]))])).unwrap();
    assert_eq!(out.sql, "x = #{__frch_id_1} OR x = #{__frch_id_2}");

    let out = render(&tree, &args(vec![("ids", list(&[0, 1]))])).unwrap();
    assert_eq!(out.sql, "");
}

#[test]
fn nested_loops_get_distinct_names() {
    let tree = build(
        r##"[{"tag": "foreach", "attrs": {"collection": "rows", "item": "row", "separator": ","},
             "children": ["(",
                {"tag": "foreach", "attrs": {"collection": "row", "item": "v", "separator": ","},
                 "children": ["#{v}"]},
             ")"]}]"##,
    );
    let rows = Value::List(vec![list(&[1, 2]), list(&[3])]);
    let out = render(&tree, &args(vec![("rows", rows)])).unwrap();

    assert_eq!(out.sql, "(#{__frch_v_1},#{__frch_v_2}),(#{__frch_v_4})");
    assert_eq!(out.bindings["__frch_v_4"], Value::Int(3));
}

#[test]
fn loop_aliases_do_not_leak() {
    let tree = build(
        r##"[{"tag": "foreach", "attrs": {"collection": "ids", "item": "id", "index": "i"},
             "children": ["#{i}:#{id.x}"]},
            " #{id}"]"##,
    );
    let out = render(
        &tree,
        &args(vec![("ids", list(&[9])), ("id", Value::Int(42))]),
    )
    .unwrap();
    assert_eq!(out.sql, "#{__frch_i_0}:#{__frch_id_0.x} #{id}");
    assert_eq!(out.bindings["__frch_i_0"], Value::Int(0));
}

#[test]
fn map_collection_uses_keys_as_index() {
    let tree = build(
        r##"[{"tag": "foreach", "attrs": {"collection": "cols", "item": "v", "index": "k", "separator": ", "},
             "children": ["${prefix}#{k} = #{v}"]}]"##,
    );
    let cols = args(vec![("a", Value::Int(1)), ("b", Value::from("x"))]);
    let out = render(&tree, &args(vec![("cols", cols)])).unwrap();
    assert_eq!(
        out.sql,
        "${prefix}#{__frch_k_0} = #{__frch_v_0}, ${prefix}#{__frch_k_1} = #{__frch_v_1}"
    );
    assert_eq!(out.bindings["__frch_k_1"], Value::from("b"));
}

#[test]
fn non_iterable_collection_is_a_binding_error() {
    let tree = build(IN_CLAUSE);
    let err = render(&tree, &args(vec![("ids", Value::Int(3))])).unwrap_err();
    assert!(err.is_binding());
    assert!(!err.is_configuration());
}
