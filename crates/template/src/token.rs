//! Scanner for delimited tokens such as `#{id}` and `${table}`.

/// Finds `open ... close` tokens and replaces each with the handler's output.
///
/// A backslash right before the open delimiter escapes the token; a backslash
/// before a close delimiter inside a token keeps that delimiter in the body.
/// An open delimiter without a matching close is copied through verbatim.
#[derive(Debug, Clone, Copy)]
pub struct TokenParser {
    open: &'static str,
    close: &'static str,
    keep_escapes: bool,
}

pub const PLACEHOLDER_TOKENS: TokenParser = TokenParser::new("#{", "}");
pub const SUBSTITUTION_TOKENS: TokenParser = TokenParser::new("${", "}");

impl TokenParser {
    pub const fn new(open: &'static str, close: &'static str) -> Self {
        Self {
            open,
            close,
            keep_escapes: false,
        }
    }

    /// Escaped open delimiters are emitted with their backslash, so the
    /// output can be scanned again later.
    pub const fn preserving_escapes(self) -> Self {
        Self {
            keep_escapes: true,
            ..self
        }
    }

    /// Replaces every token in `text`. The handler receives the token body
    /// and the byte offset in the output where its replacement will start.
    pub fn parse<E, F>(&self, text: &str, mut handler: F) -> Result<String, E>
    where
        F: FnMut(&str, usize) -> Result<String, E>,
    {
        let Some(first) = text.find(self.open) else {
            return Ok(text.to_string());
        };

        let mut out = String::with_capacity(text.len());
        let mut offset = 0;
        let mut start = first;

        loop {
            if start > 0 && text.as_bytes()[start - 1] == b'\\' {
                let keep = if self.keep_escapes { start } else { start - 1 };
                out.push_str(&text[offset..keep]);
                out.push_str(self.open);
                offset = start + self.open.len();
            } else {
                out.push_str(&text[offset..start]);
                match self.token_body(text, start + self.open.len()) {
                    Some((body, end)) => {
                        let replacement = handler(&body, out.len())?;
                        out.push_str(&replacement);
                        offset = end + self.close.len();
                    }
                    None => {
                        out.push_str(&text[start..]);
                        offset = text.len();
                    }
                }
            }

            match text[offset..].find(self.open) {
                Some(next) => start = offset + next,
                None => break,
            }
        }

        out.push_str(&text[offset..]);
        Ok(out)
    }

    /// Collects the body starting at `from`; returns it with the index of the
    /// closing delimiter.
    fn token_body(&self, text: &str, from: usize) -> Option<(String, usize)> {
        let mut body = String::new();
        let mut cursor = from;

        while let Some(found) = text[cursor..].find(self.close) {
            let end = cursor + found;
            if end > cursor && text.as_bytes()[end - 1] == b'\\' {
                body.push_str(&text[cursor..end - 1]);
                body.push_str(self.close);
                cursor = end + self.close.len();
            } else {
                body.push_str(&text[cursor..end]);
                return Some((body, end));
            }
        }
        None
    }
}
