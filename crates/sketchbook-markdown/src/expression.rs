//! Inline expression lexer.
//!
//! Two forms are recognized inside markdown text:
//!
//! - `{{> path}}` includes another document (a partial). Whitespace around
//!   `>` and quotes around the path are allowed: `{{ > 'partials/header' }}`.
//! - `{{ path }}` or `{{ template: path }}` looks up design data, optionally
//!   rendering it through a named template.
//!
//! A `{{` whose first non-space character is `>` is always a partial, so a
//! malformed partial is left as text rather than read as a data path.

/// A piece of scanned text.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    /// Plain text between expressions
    Literal(&'a str),
    /// A recognized expression
    Expression(Expression<'a>),
}

/// An inline expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression<'a> {
    /// Full source text, braces included
    pub source: &'a str,
    pub kind: ExpressionKind<'a>,
}

/// The two expression forms.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind<'a> {
    /// `{{> path}}`
    Partial { path: &'a str },
    /// `{{ template: path }}`
    Data {
        template: Option<&'a str>,
        path: &'a str,
    },
}

/// Split text into literals and expressions.
pub fn scan(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut pos = 0;

    while let Some(offset) = text[pos..].find("{{") {
        let open = pos + offset;

        match parse_at(text, open) {
            Some((expression, end)) => {
                if open > literal_start {
                    segments.push(Segment::Literal(&text[literal_start..open]));
                }
                segments.push(Segment::Expression(expression));
                literal_start = end;
                pos = end;
            }
            None => pos = open + 1,
        }
    }

    if literal_start < text.len() {
        segments.push(Segment::Literal(&text[literal_start..]));
    }

    segments
}

/// Whether text contains anything that could start an expression.
pub fn has_expressions(text: &str) -> bool {
    text.contains("{{")
}

/// Parse an expression whose `{{` starts at `open`.
///
/// Returns the expression and the byte offset just past its `}}`.
fn parse_at(text: &str, open: usize) -> Option<(Expression<'_>, usize)> {
    let body_start = open + 2;
    let close = text[body_start..].find("}}")?;
    let inner = &text[body_start..body_start + close];
    let end = body_start + close + 2;

    if inner.contains('\n') {
        return None;
    }

    let kind = if inner.trim_start().starts_with('>') {
        parse_partial(inner)?
    } else {
        parse_data(inner)?
    };

    Some((
        Expression {
            source: &text[open..end],
            kind,
        },
        end,
    ))
}

fn parse_partial(inner: &str) -> Option<ExpressionKind<'_>> {
    let rest = inner.trim_start().strip_prefix('>')?.trim_start();
    let rest = rest.strip_prefix(['\'', '"']).unwrap_or(rest);

    let len = rest
        .find(|c: char| c == '\'' || c == '"' || c.is_whitespace())
        .unwrap_or(rest.len());
    let (path, tail) = rest.split_at(len);

    let tail = tail.strip_prefix(['\'', '"']).unwrap_or(tail);
    if !tail.trim().is_empty() {
        return None;
    }

    Some(ExpressionKind::Partial { path })
}

fn parse_data(inner: &str) -> Option<ExpressionKind<'_>> {
    if inner.trim().is_empty() {
        return None;
    }

    let (template, path) = match inner.split_once(':') {
        Some((template, path)) => {
            let template = template.trim();
            (Some(template).filter(|t| !t.is_empty()), path.trim())
        }
        None => (None, inner.trim()),
    };

    Some(ExpressionKind::Data { template, path })
}
