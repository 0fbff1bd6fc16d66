use crate::{
    error::{Result, TemplateError},
    trim::TrimNode,
};
use expression_engine::{Expression, ExpressionCache};
use std::sync::Arc;

/// One fragment of a mapped statement's SQL.
///
/// Trees are built once per statement and never mutated afterwards; they are
/// shared between threads rendering different invocations.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    StaticText(String),
    Conditional(ConditionalNode),
    Choose(ChooseNode),
    Loop(LoopNode),
    Trim(TrimNode),
    VariableBind(BindNode),
    Composite(Vec<TemplateNode>),
}

impl TemplateNode {
    pub fn text(text: impl Into<String>) -> Self {
        TemplateNode::StaticText(text.into())
    }

    pub fn composite(children: Vec<TemplateNode>) -> Self {
        TemplateNode::Composite(children)
    }

    /// Whether rendering can depend on the argument. Static trees render to
    /// the same text for every invocation.
    pub fn is_dynamic(&self) -> bool {
        match self {
            TemplateNode::StaticText(_) => false,
            TemplateNode::Composite(children) => children.iter().any(TemplateNode::is_dynamic),
            _ => true,
        }
    }
}

/// Parses an expression once, sharing it with every other node using the
/// same source text.
pub(crate) fn compile(source: &str) -> Result<Arc<Expression>> {
    ExpressionCache::global()
        .get_or_parse(source)
        .map_err(|err| TemplateError::InvalidExpression {
            expression: source.to_string(),
            source: err,
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalNode {
    pub test: Arc<Expression>,
    pub body: Box<TemplateNode>,
}

impl ConditionalNode {
    pub fn new(test: &str, body: TemplateNode) -> Result<Self> {
        Ok(Self {
            test: compile(test)?,
            body: Box::new(body),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChooseNode {
    pub whens: Vec<ConditionalNode>,
    pub otherwise: Option<Box<TemplateNode>>,
}

impl ChooseNode {
    /// At most one default branch is allowed.
    pub fn new(whens: Vec<ConditionalNode>, mut otherwise: Vec<TemplateNode>) -> Result<Self> {
        if otherwise.len() > 1 {
            return Err(TemplateError::MultipleOtherwise);
        }
        Ok(Self {
            whens,
            otherwise: otherwise.pop().map(Box::new),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopNode {
    pub collection: Arc<Expression>,
    pub item: Option<String>,
    pub index: Option<String>,
    pub open: String,
    pub close: String,
    pub separator: String,
    pub body: Box<TemplateNode>,
}

impl LoopNode {
    pub fn new(collection: &str, body: TemplateNode) -> Result<Self> {
        Ok(Self {
            collection: compile(collection)?,
            item: None,
            index: None,
            open: String::new(),
            close: String::new(),
            separator: String::new(),
            body: Box::new(body),
        })
    }

    pub fn item(mut self, alias: &str) -> Self {
        self.item = Some(alias.to_string());
        self
    }

    pub fn index(mut self, alias: &str) -> Self {
        self.index = Some(alias.to_string());
        self
    }

    pub fn open(mut self, open: &str) -> Self {
        self.open = open.to_string();
        self
    }

    pub fn close(mut self, close: &str) -> Self {
        self.close = close.to_string();
        self
    }

    pub fn separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }
}

/// `<bind name=".." value=".."/>`: stores an evaluated value for later nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct BindNode {
    pub name: String,
    pub expression: Arc<Expression>,
}

impl BindNode {
    pub fn new(name: &str, expression: &str) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            expression: compile(expression)?,
        })
    }
}
