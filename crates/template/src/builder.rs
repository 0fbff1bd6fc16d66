use crate::{
    descriptor::ElementDescriptor,
    error::{Result, TemplateError},
    node::{BindNode, ChooseNode, ConditionalNode, LoopNode, TemplateNode},
    token::SUBSTITUTION_TOKENS,
    trim::TrimNode,
};
use std::{collections::HashMap, convert::Infallible};
use tracing::{trace, warn};

/// Turns element descriptors into an immutable node tree.
///
/// `${name}` in text and attribute values is substituted here, once, from
/// the configured variables; unknown names are left as written. `<include>`
/// elements are expanded from the registered fragments.
#[derive(Debug, Clone, Default)]
pub struct TemplateBuilder {
    variables: HashMap<String, String>,
    fragments: HashMap<String, Vec<ElementDescriptor>>,
}

struct Scope<'a> {
    variables: &'a HashMap<String, String>,
    includes: &'a [String],
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variables<I, K, V>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.variables
            .extend(variables.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_fragment(mut self, id: &str, body: Vec<ElementDescriptor>) -> Self {
        self.add_fragment(id, body);
        self
    }

    pub fn add_fragment(&mut self, id: &str, body: Vec<ElementDescriptor>) {
        self.fragments.insert(id.to_string(), body);
    }

    pub fn has_fragment(&self, id: &str) -> bool {
        self.fragments.contains_key(id)
    }

    pub fn build(&self, body: &[ElementDescriptor]) -> Result<TemplateNode> {
        let scope = Scope {
            variables: &self.variables,
            includes: &[],
        };
        self.build_children(body, &scope)
    }

    fn build_children(&self, body: &[ElementDescriptor], scope: &Scope<'_>) -> Result<TemplateNode> {
        let children = body
            .iter()
            .map(|element| self.build_element(element, scope))
            .collect::<Result<Vec<_>>>()?;
        Ok(TemplateNode::composite(children))
    }

    fn build_element(&self, element: &ElementDescriptor, scope: &Scope<'_>) -> Result<TemplateNode> {
        let tag = match element {
            ElementDescriptor::Text(text) => {
                return Ok(TemplateNode::text(substitute(text, scope.variables)));
            }
            ElementDescriptor::Element { tag, .. } => tag.as_str(),
        };

        let children = element.children();
        match tag {
            "if" | "when" => Ok(TemplateNode::Conditional(self.conditional(element, scope)?)),
            "choose" => self.choose(element, scope),
            "foreach" => {
                let mut node = LoopNode::new(
                    &required(element, "collection", scope)?,
                    self.build_children(children, scope)?,
                )?;
                node.item = attr(element, "item", scope);
                node.index = attr(element, "index", scope);
                node.open = attr(element, "open", scope).unwrap_or_default();
                node.close = attr(element, "close", scope).unwrap_or_default();
                node.separator = attr(element, "separator", scope).unwrap_or_default();
                Ok(TemplateNode::Loop(node))
            }
            "trim" => Ok(TemplateNode::Trim(TrimNode::new(
                self.build_children(children, scope)?,
                attr(element, "prefix", scope).as_deref(),
                attr(element, "prefixOverrides", scope).as_deref(),
                attr(element, "suffix", scope).as_deref(),
                attr(element, "suffixOverrides", scope).as_deref(),
            ))),
            "where" => Ok(TemplateNode::Trim(TrimNode::where_clause(
                self.build_children(children, scope)?,
            ))),
            "set" => Ok(TemplateNode::Trim(TrimNode::set_clause(
                self.build_children(children, scope)?,
            ))),
            "bind" => Ok(TemplateNode::VariableBind(BindNode::new(
                &required(element, "name", scope)?,
                &required(element, "value", scope)?,
            )?)),
            "include" => self.include(element, scope),
            // A stray default branch outside <choose> renders unconditionally.
            "otherwise" => self.build_children(children, scope),
            other => Err(TemplateError::UnknownElement(other.to_string())),
        }
    }

    fn conditional(&self, element: &ElementDescriptor, scope: &Scope<'_>) -> Result<ConditionalNode> {
        ConditionalNode::new(
            &required(element, "test", scope)?,
            self.build_children(element.children(), scope)?,
        )
    }

    fn choose(&self, element: &ElementDescriptor, scope: &Scope<'_>) -> Result<TemplateNode> {
        let mut whens = Vec::new();
        let mut otherwise = Vec::new();

        for child in element.children() {
            match child.tag() {
                Some("when") | Some("if") => whens.push(self.conditional(child, scope)?),
                Some("otherwise") => otherwise.push(self.build_children(child.children(), scope)?),
                Some(other) => warn!("Ignoring <{}> inside <choose>", other),
                None => {}
            }
        }

        Ok(TemplateNode::Choose(ChooseNode::new(whens, otherwise)?))
    }

    fn include(&self, element: &ElementDescriptor, scope: &Scope<'_>) -> Result<TemplateNode> {
        let refid = required(element, "refid", scope)?;
        if scope.includes.contains(&refid) {
            return Err(TemplateError::CircularInclude(refid));
        }
        let fragment = self
            .fragments
            .get(&refid)
            .ok_or_else(|| TemplateError::UnknownFragment(refid.clone()))?;

        let mut variables = scope.variables.clone();
        for property in element.children() {
            if property.tag() != Some("property") {
                continue;
            }
            let name = required(property, "name", scope)?;
            let value = required(property, "value", scope)?;
            variables.insert(name, value);
        }

        let mut includes = scope.includes.to_vec();
        includes.push(refid.clone());
        trace!("Including SQL fragment '{}'", refid);

        self.build_children(
            fragment,
            &Scope {
                variables: &variables,
                includes: &includes,
            },
        )
    }
}

fn attr(element: &ElementDescriptor, name: &str, scope: &Scope<'_>) -> Option<String> {
    element
        .attr(name)
        .map(|value| substitute(value, scope.variables))
}

fn required(element: &ElementDescriptor, name: &str, scope: &Scope<'_>) -> Result<String> {
    attr(element, name, scope).ok_or_else(|| TemplateError::MissingAttribute {
        element: element.tag().unwrap_or_default().to_string(),
        attribute: name.to_string(),
    })
}

/// Replaces `${name}` with configured variables, leaving unknown names intact.
pub fn substitute(text: &str, variables: &HashMap<String, String>) -> String {
    SUBSTITUTION_TOKENS
        .parse(text, |name, _| {
            Ok::<_, Infallible>(match variables.get(name.trim()) {
                Some(value) => value.clone(),
                None => format!("${{{name}}}"),
            })
        })
        .unwrap_or_else(|never| match never {})
}
