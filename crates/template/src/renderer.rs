use crate::{
    context::RenderingContext,
    error::{Result, TemplateError},
    node::{BindNode, ChooseNode, ConditionalNode, LoopNode, TemplateNode},
    token::PLACEHOLDER_TOKENS,
    trim::TrimNode,
};
use expression_engine::{Expression, ExpressionError};
use model::core::value::Value;
use std::{collections::HashMap, convert::Infallible};
use tracing::{debug, trace};

/// Prefix of the names loop iterations bind their element and index under.
pub const LOOP_BINDING_PREFIX: &str = "__frch_";

/// Output of one render: SQL with `#{...}` placeholders still in place, plus
/// every value bound along the way (bind nodes and loop iterations).
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSql {
    pub sql: String,
    pub bindings: HashMap<String, Value>,
}

pub trait Render {
    /// Appends this node's output to `ctx`. Returns whether anything was
    /// selected for rendering.
    fn render(&self, ctx: &mut RenderingContext<'_>) -> Result<bool>;
}

/// Renders `node` against `argument` with a fresh context.
pub fn render(node: &TemplateNode, argument: &Value) -> Result<RenderedSql> {
    render_with(node, RenderingContext::new(argument))
}

pub fn render_with(node: &TemplateNode, mut ctx: RenderingContext<'_>) -> Result<RenderedSql> {
    node.render(&mut ctx)?;
    let (sql, bindings) = ctx.into_parts();
    debug!("Rendered SQL ({} bindings): {}", bindings.len(), sql);
    Ok(RenderedSql { sql, bindings })
}

impl Render for TemplateNode {
    fn render(&self, ctx: &mut RenderingContext<'_>) -> Result<bool> {
        match self {
            TemplateNode::StaticText(text) => {
                ctx.append(text);
                Ok(true)
            }
            TemplateNode::Conditional(node) => node.render(ctx),
            TemplateNode::Choose(node) => node.render(ctx),
            TemplateNode::Loop(node) => node.render(ctx),
            TemplateNode::Trim(node) => node.render(ctx),
            TemplateNode::VariableBind(node) => node.render(ctx),
            TemplateNode::Composite(children) => {
                for child in children {
                    child.render(ctx)?;
                }
                Ok(true)
            }
        }
    }
}

fn evaluation_error(expression: &Expression, source: ExpressionError) -> TemplateError {
    TemplateError::Evaluation {
        expression: expression.source().to_string(),
        source,
    }
}

impl Render for ConditionalNode {
    fn render(&self, ctx: &mut RenderingContext<'_>) -> Result<bool> {
        let passed = self
            .test
            .evaluate_boolean(&*ctx)
            .map_err(|source| evaluation_error(&self.test, source))?;
        trace!("Test '{}' evaluated to {}", self.test, passed);

        if passed {
            self.body.render(ctx)?;
        }
        Ok(passed)
    }
}

impl Render for ChooseNode {
    fn render(&self, ctx: &mut RenderingContext<'_>) -> Result<bool> {
        for when in &self.whens {
            if when.render(ctx)? {
                return Ok(true);
            }
        }
        match &self.otherwise {
            Some(otherwise) => {
                otherwise.render(ctx)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Render for LoopNode {
    fn render(&self, ctx: &mut RenderingContext<'_>) -> Result<bool> {
        let items = self
            .collection
            .evaluate_iterable(&*ctx)
            .map_err(|source| TemplateError::Collection {
                expression: self.collection.source().to_string(),
                source,
            })?;

        if items.is_empty() {
            return Ok(true);
        }

        let mut rendered = Vec::with_capacity(items.len());
        for (index, item) in items {
            let unique = ctx.next_unique_number();

            let mut scope = HashMap::new();
            if let Some(alias) = &self.index {
                ctx.bind(loop_binding_name(alias, unique), index.clone());
                scope.insert(alias.clone(), index);
            }
            if let Some(alias) = &self.item {
                ctx.bind(loop_binding_name(alias, unique), item.clone());
                scope.insert(alias.clone(), item);
            }

            let (result, body) = ctx.scoped(scope, |ctx| ctx.capture(|ctx| self.body.render(ctx)));
            result?;

            if !body.trim().is_empty() {
                rendered.push(self.itemize(&body, unique));
            }
        }

        if !rendered.is_empty() {
            ctx.append(&self.open);
            ctx.append(&rendered.join(&self.separator));
            ctx.append(&self.close);
        }
        Ok(true)
    }
}

impl LoopNode {
    /// Points placeholders that name the element or index alias at this
    /// iteration's synthetic binding.
    fn itemize(&self, body: &str, unique: usize) -> String {
        PLACEHOLDER_TOKENS
            .preserving_escapes()
            .parse(body, |content, _| {
                let mut content = content.to_string();
                for alias in [&self.item, &self.index].into_iter().flatten() {
                    if let Some(rest) = strip_alias(&content, alias) {
                        content = format!("{}{}", loop_binding_name(alias, unique), rest);
                        break;
                    }
                }
                Ok::<_, Infallible>(format!("#{{{}}}", content.replace('}', "\\}")))
            })
            .unwrap_or_else(|never| match never {})
    }
}

pub fn loop_binding_name(alias: &str, unique: usize) -> String {
    format!("{LOOP_BINDING_PREFIX}{alias}_{unique}")
}

/// Returns what follows `alias` when the placeholder refers to it, either
/// bare or followed by a path, attribute or type separator.
fn strip_alias<'a>(content: &'a str, alias: &str) -> Option<&'a str> {
    let trimmed = content.trim_start();
    let rest = trimmed.strip_prefix(alias)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if matches!(c, '.' | ',' | ':' | '[') || c.is_whitespace() => Some(rest),
        _ => None,
    }
}

impl Render for TrimNode {
    fn render(&self, ctx: &mut RenderingContext<'_>) -> Result<bool> {
        let (result, body) = ctx.capture(|ctx| self.body.render(ctx));
        let selected = result?;
        ctx.append(&self.apply(&body));
        Ok(selected)
    }
}

impl Render for BindNode {
    fn render(&self, ctx: &mut RenderingContext<'_>) -> Result<bool> {
        let value = self
            .expression
            .evaluate(&*ctx)
            .map_err(|source| evaluation_error(&self.expression, source))?;
        trace!("Bound '{}' = {}", self.name, value);
        ctx.bind(self.name.clone(), value);
        Ok(true)
    }
}
