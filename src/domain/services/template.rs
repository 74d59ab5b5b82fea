//! Template rendering for proxy configuration variants
//!
//! Templates use `{{name}}` placeholders (inner whitespace allowed). Every
//! placeholder must name a known variable: a typo fails the render instead of
//! silently producing a broken configuration. Text outside placeholders is
//! copied byte for byte, so nginx's own `{ }` blocks are untouched.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unterminated placeholder starting at line {line}")]
    Unterminated { line: usize },

    #[error("empty placeholder at line {line}")]
    EmptyPlaceholder { line: usize },

    #[error("unknown placeholder '{{{{{name}}}}}' at line {line}")]
    UnknownVariable { name: String, line: usize },
}

/// Variables available to a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars {
    vars: BTreeMap<String, String>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: impl Into<String>) -> Self {
        self.vars.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }
}

/// Render `template`, substituting every `{{name}}` placeholder
pub fn render(template: &str, vars: &TemplateVars) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let line = line_of(template, template.len() - rest.len() + start);

        let after_open = &rest[start + 2..];
        let end = after_open
            .find("}}")
            .ok_or(TemplateError::Unterminated { line })?;

        let name = after_open[..end].trim();
        if name.is_empty() {
            return Err(TemplateError::EmptyPlaceholder { line });
        }
        let value = vars.get(name).ok_or_else(|| TemplateError::UnknownVariable {
            name: name.to_string(),
            line,
        })?;
        out.push_str(value);

        rest = &after_open[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}
