use expression_engine::parser::{ExpressionParser, Rule};
use pest::Parser;

#[test]
fn test_parse_comparisons() {
    let inputs = vec![
        "id == 1",
        "id != null",
        "age >= 18 && age <= 65",
        "age gte 18 and age lte 65",
        "name neq 'x' or name eq \"y\"",
        "a < b || b > c",
        "score lt 3.5",
    ];

    for input in inputs {
        let result = ExpressionParser::parse(Rule::expression, input);
        assert!(result.is_ok(), "Failed to parse: {}", input);
    }
}

#[test]
fn test_parse_navigation() {
    let inputs = vec![
        "user.address.city",
        "orders[0].items[1].sku",
        "attrs['color'] != null",
        "list.size() > 0",
        "name.trim().length() == 0",
        "_parameter.ids.contains(3)",
        "__frch_item_0.id",
    ];

    for input in inputs {
        let result = ExpressionParser::parse(Rule::expression, input);
        assert!(result.is_ok(), "Failed to parse: {}", input);
    }
}

#[test]
fn test_parse_arithmetic_and_unary() {
    let inputs = vec!["-1 + 2 * 3", "(a + b) % 2 == 0", "!flag", "not (a and b)", "'%' + name + '%'"];

    for input in inputs {
        let result = ExpressionParser::parse(Rule::expression, input);
        assert!(result.is_ok(), "Failed to parse: {}", input);
    }
}

#[test]
fn test_reject_malformed() {
    let inputs = vec!["", "a ==", "== a", "a.", "a[", "f(", "a b", "'unterminated", "a && && b"];

    for input in inputs {
        let result = ExpressionParser::parse(Rule::expression, input);
        assert!(result.is_err(), "Should fail to parse: {}", input);
    }
}
