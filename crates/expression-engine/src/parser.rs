use crate::{
    ast::{BinaryOp, CompiledExpression, UnaryOp},
    error::{ExpressionError, Result},
};
use bigdecimal::BigDecimal;
use model::core::value::Value;
use pest::{Parser, iterators::Pair};
use pest_derive::Parser;
use std::str::FromStr;

#[derive(Parser)]
#[grammar = "grammar/expression.pest"]
pub struct ExpressionParser;

/// Parse expression text into its compiled form.
pub fn parse(source: &str) -> Result<CompiledExpression> {
    let mut pairs = ExpressionParser::parse(Rule::expression, source)
        .map_err(|e| syntax(source, e.to_string()))?;

    let root = pairs
        .next()
        .and_then(|expression| expression.into_inner().next())
        .ok_or_else(|| syntax(source, "empty expression"))?;

    build(root, source)
}

fn build(pair: Pair<Rule>, source: &str) -> Result<CompiledExpression> {
    match pair.as_rule() {
        Rule::or_expr
        | Rule::and_expr
        | Rule::equality
        | Rule::comparison
        | Rule::additive
        | Rule::multiplicative => build_binary(pair, source),
        Rule::unary => build_unary(pair, source),
        Rule::postfix => build_postfix(pair, source),
        Rule::primary => {
            let inner = first_inner(pair, source)?;
            build(inner, source)
        }
        Rule::literal => build_literal(pair, source),
        Rule::ident => Ok(CompiledExpression::Identifier(pair.as_str().to_string())),
        rule => Err(syntax(source, format!("unexpected rule in expression: {rule:?}"))),
    }
}

// Operators at one precedence level fold to the left: a - b - c == (a - b) - c
fn build_binary(pair: Pair<Rule>, source: &str) -> Result<CompiledExpression> {
    let mut inner = pair.into_inner();
    let first = inner
        .next()
        .ok_or_else(|| syntax(source, "missing operand"))?;
    let mut left = build(first, source)?;

    while let Some(op_pair) = inner.next() {
        let op = BinaryOp::from_symbol(op_pair.as_str())
            .ok_or_else(|| syntax(source, format!("unknown operator: {}", op_pair.as_str())))?;
        let right = inner
            .next()
            .ok_or_else(|| syntax(source, format!("missing right operand for '{op}'")))?;

        left = CompiledExpression::Binary {
            left: Box::new(left),
            op,
            right: Box::new(build(right, source)?),
        };
    }

    Ok(left)
}

fn build_unary(pair: Pair<Rule>, source: &str) -> Result<CompiledExpression> {
    let mut ops = Vec::new();
    let mut operand = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::unary_op => {
                let op = UnaryOp::from_symbol(inner.as_str())
                    .ok_or_else(|| syntax(source, format!("unknown operator: {}", inner.as_str())))?;
                ops.push(op);
            }
            _ => operand = Some(build(inner, source)?),
        }
    }

    let mut expr = operand.ok_or_else(|| syntax(source, "missing operand"))?;
    for op in ops.into_iter().rev() {
        expr = CompiledExpression::Unary {
            op,
            operand: Box::new(expr),
        };
    }
    Ok(expr)
}

fn build_postfix(pair: Pair<Rule>, source: &str) -> Result<CompiledExpression> {
    let mut inner = pair.into_inner();
    let primary = inner
        .next()
        .ok_or_else(|| syntax(source, "missing operand"))?;
    let mut expr = build(primary, source)?;

    for accessor in inner {
        let access = first_inner(accessor, source)?;
        expr = match access.as_rule() {
            Rule::property => {
                let name = first_inner(access, source)?;
                CompiledExpression::Property {
                    target: Box::new(expr),
                    name: name.as_str().to_string(),
                }
            }
            Rule::index => {
                let index = first_inner(access, source)?;
                CompiledExpression::Index {
                    target: Box::new(expr),
                    index: Box::new(build(index, source)?),
                }
            }
            Rule::method_call => {
                let mut parts = access.into_inner();
                let name = parts
                    .next()
                    .ok_or_else(|| syntax(source, "missing method name"))?;
                let args = parts
                    .map(|arg| build(arg, source))
                    .collect::<Result<Vec<_>>>()?;
                CompiledExpression::MethodCall {
                    target: Box::new(expr),
                    name: name.as_str().to_string(),
                    args,
                }
            }
            rule => return Err(syntax(source, format!("unexpected accessor: {rule:?}"))),
        };
    }

    Ok(expr)
}

fn build_literal(pair: Pair<Rule>, source: &str) -> Result<CompiledExpression> {
    let literal = first_inner(pair, source)?;
    let text = literal.as_str();

    let value = match literal.as_rule() {
        Rule::null_lit => Value::Null,
        Rule::bool_lit => Value::Boolean(text == "true"),
        Rule::number if text.contains('.') => BigDecimal::from_str(text)
            .map(Value::Decimal)
            .map_err(|e| syntax(source, format!("invalid number '{text}': {e}")))?,
        Rule::number => match text.parse::<i64>() {
            Ok(i) => Value::Int(i),
            Err(_) => BigDecimal::from_str(text)
                .map(Value::Decimal)
                .map_err(|e| syntax(source, format!("invalid number '{text}': {e}")))?,
        },
        Rule::string => Value::String(unquote(text)),
        rule => return Err(syntax(source, format!("unexpected literal: {rule:?}"))),
    };

    Ok(CompiledExpression::Literal(value))
}

fn unquote(text: &str) -> String {
    let body = &text[1..text.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn first_inner<'a>(pair: Pair<'a, Rule>, source: &str) -> Result<Pair<'a, Rule>> {
    let rule = pair.as_rule();
    pair.into_inner()
        .next()
        .ok_or_else(|| syntax(source, format!("empty {rule:?}")))
}

fn syntax(source: &str, message: impl Into<String>) -> ExpressionError {
    ExpressionError::Syntax {
        expression: source.to_string(),
        message: message.into(),
    }
}
