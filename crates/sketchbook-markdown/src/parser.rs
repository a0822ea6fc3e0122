//! Markdown to HTML with inline expression expansion.

use std::collections::HashSet;

use pulldown_cmark::{
    html, CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use serde::Serialize;

use crate::expression::{has_expressions, scan, Expression, Segment};

/// A heading of the literal markdown source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingEntry {
    /// Heading text
    pub text: String,
    /// Anchor ID
    pub anchor: String,
    /// HTML tag name (`h1`..`h6`)
    pub tag: String,
}

/// Replacement for an inline expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expansion {
    /// Markup inserted as is
    Html(String),
    /// Text inserted escaped
    Text(String),
}

/// Resolves inline expressions while markdown is rendered.
pub trait InlineResolver {
    type Error;

    /// Produce the replacement for one expression.
    fn resolve(&self, expression: &Expression<'_>) -> Result<Expansion, Self::Error>;
}

/// Resolver that leaves every expression as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl InlineResolver for Verbatim {
    type Error = std::convert::Infallible;

    fn resolve(&self, expression: &Expression<'_>) -> Result<Expansion, Self::Error> {
        Ok(Expansion::Text(expression.source.to_string()))
    }
}

/// Markdown extensions enabled for every document.
pub fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_DEFINITION_LIST
}

/// Extract headings in document order.
///
/// Expressions are not expanded, so headings reflect the document as written.
pub fn extract_headings(source: &str) -> Vec<HeadingEntry> {
    let mut headings = Vec::new();
    let mut anchors = Anchors::default();
    let mut current: Option<(u8, String)> = None;

    for event in Parser::new_ext(source, options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((level as u8, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, ref mut heading_text)) = current {
                    heading_text.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    headings.push(HeadingEntry {
                        anchor: anchors.unique(slugify(&text)),
                        tag: format!("h{}", level),
                        text,
                    });
                }
            }
            _ => {}
        }
    }

    headings
}

/// Anchors already used in a document.
///
/// A repeated slug gets a numeric suffix: `usage`, `usage-1`, `usage-2`.
#[derive(Default)]
struct Anchors {
    used: HashSet<String>,
}

impl Anchors {
    fn unique(&mut self, slug: String) -> String {
        let mut anchor = slug.clone();
        let mut n = 0;
        while self.used.contains(&anchor) {
            n += 1;
            anchor = format!("{}-{}", slug, n);
        }
        self.used.insert(anchor.clone());
        anchor
    }
}

/// A heading whose events are held until its anchor is known.
struct PendingHeading<'a> {
    level: HeadingLevel,
    id: Option<CowStr<'a>>,
    classes: Vec<CowStr<'a>>,
    attrs: Vec<(CowStr<'a>, Option<CowStr<'a>>)>,
    top_level: bool,
    text: String,
    events: Vec<Event<'a>>,
}

/// Render markdown to HTML, expanding inline expressions with `resolver`.
///
/// Headings get anchors from their literal text, top-level headings open
/// nested `<section>` elements, and images outside links link to themselves.
/// Expressions inside code and images are left alone.
pub fn render_html<R: InlineResolver>(source: &str, resolver: &R) -> Result<String, R::Error> {
    let parser = TextMergeStream::new(Parser::new_ext(source, options()));

    let mut events: Vec<Event<'_>> = Vec::new();
    let mut sections: Vec<u8> = Vec::new();
    let mut heading: Option<PendingHeading<'_>> = None;
    let mut anchors = Anchors::default();
    let mut depth = 0usize;
    let mut in_code_block = false;
    let mut link_depth = 0usize;
    let mut images: Vec<bool> = Vec::new();

    for event in parser {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                heading = Some(PendingHeading {
                    level,
                    id,
                    classes,
                    attrs,
                    top_level: depth == 0,
                    text: String::new(),
                    events: Vec::new(),
                });
                depth += 1;
            }

            Event::End(TagEnd::Heading(level)) => {
                depth = depth.saturating_sub(1);

                if let Some(pending) = heading.take() {
                    let rank = pending.level as u8;
                    if pending.top_level {
                        while sections.last().is_some_and(|open| *open >= rank) {
                            sections.pop();
                            events.push(Event::Html(CowStr::Borrowed("</section>\n")));
                        }
                        sections.push(rank);
                        events.push(Event::Html(CowStr::Borrowed("<section>\n")));
                    }

                    let anchor = pending
                        .id
                        .unwrap_or_else(|| anchors.unique(slugify(&pending.text)).into());

                    events.push(Event::Start(Tag::Heading {
                        level: pending.level,
                        id: Some(anchor),
                        classes: pending.classes,
                        attrs: pending.attrs,
                    }));
                    events.extend(pending.events);
                    events.push(Event::End(TagEnd::Heading(level)));
                }
            }

            event => {
                let target = match heading.as_mut() {
                    Some(pending) => {
                        if let Event::Text(text) | Event::Code(text) = &event {
                            pending.text.push_str(text);
                        }
                        &mut pending.events
                    }
                    None => &mut events,
                };

                match event {
                    Event::Start(tag @ Tag::CodeBlock(_)) => {
                        in_code_block = true;
                        depth += 1;
                        target.push(Event::Start(tag));
                    }
                    Event::End(TagEnd::CodeBlock) => {
                        in_code_block = false;
                        depth = depth.saturating_sub(1);
                        target.push(Event::End(TagEnd::CodeBlock));
                    }
                    Event::Start(tag @ Tag::Link { .. }) => {
                        link_depth += 1;
                        depth += 1;
                        target.push(Event::Start(tag));
                    }
                    Event::End(TagEnd::Link) => {
                        link_depth = link_depth.saturating_sub(1);
                        depth = depth.saturating_sub(1);
                        target.push(Event::End(TagEnd::Link));
                    }
                    Event::Start(Tag::Image {
                        link_type,
                        dest_url,
                        title,
                        id,
                    }) => {
                        let linkify = link_depth == 0;
                        if linkify {
                            target.push(Event::Start(Tag::Link {
                                link_type: LinkType::Inline,
                                dest_url: dest_url.clone(),
                                title: CowStr::Borrowed(""),
                                id: CowStr::Borrowed(""),
                            }));
                        }
                        images.push(linkify);
                        depth += 1;
                        target.push(Event::Start(Tag::Image {
                            link_type,
                            dest_url,
                            title,
                            id,
                        }));
                    }
                    Event::End(TagEnd::Image) => {
                        depth = depth.saturating_sub(1);
                        target.push(Event::End(TagEnd::Image));
                        if images.pop().unwrap_or(false) {
                            target.push(Event::End(TagEnd::Link));
                        }
                    }
                    Event::Text(text) if !in_code_block && images.is_empty() => {
                        expand_text(text, resolver, target)?;
                    }
                    Event::Html(markup) if images.is_empty() && has_expressions(&markup) => {
                        expand_html(markup, false, resolver, target)?;
                    }
                    Event::InlineHtml(markup) if images.is_empty() && has_expressions(&markup) => {
                        expand_html(markup, true, resolver, target)?;
                    }
                    Event::Start(tag) => {
                        depth += 1;
                        target.push(Event::Start(tag));
                    }
                    Event::End(tag) => {
                        depth = depth.saturating_sub(1);
                        target.push(Event::End(tag));
                    }
                    other => target.push(other),
                }
            }
        }
    }

    for _ in sections.drain(..) {
        events.push(Event::Html(CowStr::Borrowed("</section>\n")));
    }

    let mut html_output = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut html_output, events.into_iter());

    Ok(html_output)
}

/// Replace expressions in a text event with their expansions.
fn expand_text<'a, R: InlineResolver>(
    text: CowStr<'a>,
    resolver: &R,
    out: &mut Vec<Event<'a>>,
) -> Result<(), R::Error> {
    if !has_expressions(&text) {
        out.push(Event::Text(text));
        return Ok(());
    }

    for segment in scan(&text) {
        match segment {
            Segment::Literal(literal) => out.push(Event::Text(literal.to_string().into())),
            Segment::Expression(expression) => match resolver.resolve(&expression)? {
                Expansion::Html(markup) => out.push(Event::InlineHtml(markup.into())),
                Expansion::Text(text) => out.push(Event::Text(text.into())),
            },
        }
    }

    Ok(())
}

/// Replace expressions in raw HTML, keeping the surrounding markup raw.
fn expand_html<'a, R: InlineResolver>(
    markup: CowStr<'a>,
    inline: bool,
    resolver: &R,
    out: &mut Vec<Event<'a>>,
) -> Result<(), R::Error> {
    let raw = |html: String| -> Event<'a> {
        if inline {
            Event::InlineHtml(html.into())
        } else {
            Event::Html(html.into())
        }
    };

    for segment in scan(&markup) {
        match segment {
            Segment::Literal(literal) => out.push(raw(literal.to_string())),
            Segment::Expression(expression) => match resolver.resolve(&expression)? {
                Expansion::Html(html) => out.push(raw(html)),
                Expansion::Text(text) => out.push(Event::Text(text.into())),
            },
        }
    }

    Ok(())
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
