use crate::error::ModelError;
use std::fmt;

/// One `name[index]` step of a property path. Either part may be absent,
/// but not both: `[0]` indexes the current value directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub name: String,
    pub index: Option<String>,
}

impl PathSegment {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            index: None,
        }
    }

    /// The segment as written, e.g. `roles[0]`.
    pub fn indexed_name(&self) -> String {
        match &self.index {
            Some(index) => format!("{}[{}]", self.name, index),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    pub fn parse(path: &str) -> Result<Self, ModelError> {
        let raw = path.trim();
        if raw.is_empty() {
            return Err(invalid(raw, "path is empty"));
        }

        let mut segments = Vec::new();
        for part in split_top_level(raw) {
            segments.push(parse_segment(raw, part)?);
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Name of the first segment, e.g. `user` for `user.roles[0]`.
    pub fn root(&self) -> &str {
        &self.segments[0].name
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_simple(&self) -> bool {
        self.segments.len() == 1 && self.segments[0].index.is_none()
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// Dots inside brackets belong to the index (map keys may contain them).
fn split_top_level(path: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in path.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                parts.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&path[start..]);
    parts
}

fn parse_segment(raw: &str, part: &str) -> Result<PathSegment, ModelError> {
    let part = part.trim();
    let Some(open) = part.find('[') else {
        if part.is_empty() {
            return Err(invalid(raw, "empty segment"));
        }
        return Ok(PathSegment::named(part));
    };

    if !part.ends_with(']') {
        return Err(invalid(raw, "unterminated index"));
    }
    let name = part[..open].trim();
    let index = part[open + 1..part.len() - 1].trim();
    if index.is_empty() {
        return Err(invalid(raw, "empty index"));
    }
    let index = index.trim_matches(|c| c == '\'' || c == '"');

    Ok(PathSegment {
        name: name.to_string(),
        index: Some(index.to_string()),
    })
}

fn invalid(path: &str, message: &str) -> ModelError {
    ModelError::InvalidPath {
        path: path.to_string(),
        message: message.to_string(),
    }
}
