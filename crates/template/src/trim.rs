use crate::node::TemplateNode;

const WHERE_PREFIX_OVERRIDES: &str = "AND |OR |AND\n|OR\n|AND\r|OR\r|AND\t|OR\t";

/// Wraps a body, dropping a dangling leading/trailing token and adding a
/// prefix/suffix when anything is left.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimNode {
    pub body: Box<TemplateNode>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub prefix_overrides: Vec<String>,
    pub suffix_overrides: Vec<String>,
}

impl TrimNode {
    /// Overrides are `|`-separated; whitespace inside each token is kept.
    pub fn new(
        body: TemplateNode,
        prefix: Option<&str>,
        prefix_overrides: Option<&str>,
        suffix: Option<&str>,
        suffix_overrides: Option<&str>,
    ) -> Self {
        Self {
            body: Box::new(body),
            prefix: prefix.map(str::to_string),
            suffix: suffix.map(str::to_string),
            prefix_overrides: parse_overrides(prefix_overrides),
            suffix_overrides: parse_overrides(suffix_overrides),
        }
    }

    pub fn where_clause(body: TemplateNode) -> Self {
        Self::new(body, Some("WHERE"), Some(WHERE_PREFIX_OVERRIDES), None, None)
    }

    pub fn set_clause(body: TemplateNode) -> Self {
        Self::new(body, Some("SET"), None, None, Some(","))
    }

    /// Applies the trim rules to the rendered body.
    pub fn apply(&self, body: &str) -> String {
        if body.trim().is_empty() {
            return String::new();
        }

        let mut text = body.trim_start();
        if let Some(token) = self
            .prefix_overrides
            .iter()
            .find(|token| starts_with_ignore_case(text, token))
        {
            text = text[token.len()..].trim_start();
        }

        let core = text.trim_end();
        let trailing = &text[core.len()..];
        let mut core = core;
        if let Some(token) = self
            .suffix_overrides
            .iter()
            .map(|token| token.trim())
            .find(|token| !token.is_empty() && ends_with_ignore_case(core, token))
        {
            core = &core[..core.len() - token.len()];
        }

        if core.trim().is_empty() {
            return String::new();
        }

        let mut out = String::with_capacity(body.len() + 16);
        if let Some(prefix) = &self.prefix {
            out.push_str(prefix);
            out.push(' ');
        }
        out.push_str(core);
        if let Some(suffix) = &self.suffix {
            out.push(' ');
            out.push_str(suffix);
        }
        out.push_str(trailing);
        out
    }
}

fn parse_overrides(overrides: Option<&str>) -> Vec<String> {
    overrides
        .map(|list| {
            list.split('|')
                .filter(|token| !token.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn starts_with_ignore_case(text: &str, token: &str) -> bool {
    text.get(..token.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(token))
}

fn ends_with_ignore_case(text: &str, token: &str) -> bool {
    text.len() >= token.len()
        && text
            .get(text.len() - token.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(token))
}
