//! Prompt template for the reasoning loop.
//!
//! Templates use `{query}`, `{history}` and `{tools}` placeholders. Doubled
//! braces (`{{`, `}}`) stand for literal braces so JSON examples can be
//! embedded in the prompt.

use std::path::Path;

use thiserror::Error;

/// Template shipped with the crate, used when no file is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../../data/input/react.txt");

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read prompt template {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown placeholder {{{0}}} in prompt template")]
    UnknownPlaceholder(String),

    #[error("Unbalanced brace at byte {0} in prompt template")]
    UnbalancedBrace(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Query,
    History,
    Tools,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Field),
}

/// A parsed prompt template.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse template text, rejecting unknown placeholders and stray braces.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((i, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    text.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, '{')) | None => return Err(TemplateError::UnbalancedBrace(i)),
                            Some((_, ch)) => name.push(ch),
                        }
                    }
                    let field = match name.trim() {
                        "query" => Field::Query,
                        "history" => Field::History,
                        "tools" => Field::Tools,
                        other => return Err(TemplateError::UnknownPlaceholder(other.to_string())),
                    };
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' => return Err(TemplateError::UnbalancedBrace(i)),
                _ => text.push(c),
            }
        }

        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        Ok(Self { segments })
    }

    /// Load and parse a template file.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&source)
    }

    /// Substitute the placeholders.
    pub fn render(&self, query: &str, history: &str, tools: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(Field::Query) => out.push_str(query),
                Segment::Field(Field::History) => out.push_str(history),
                Segment::Field(Field::Tools) => out.push_str(tools),
            }
        }
        out
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        // The bundled template is covered by tests.
        Self::parse(DEFAULT_TEMPLATE).unwrap_or_else(|_| Self {
            segments: vec![Segment::Field(Field::Query)],
        })
    }
}
