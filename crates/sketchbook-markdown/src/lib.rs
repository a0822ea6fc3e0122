//! Markdown rendering for sketchbook pages.
//!
//! Renders markdown to HTML with pulldown-cmark, extracts headings for tables
//! of contents, and expands the inline `{{> partial}}` and `{{ template: data }}`
//! expressions through a caller-supplied [`InlineResolver`].

pub mod expression;
pub mod parser;

pub use expression::{scan, Expression, ExpressionKind, Segment};
pub use parser::{
    extract_headings, render_html, slugify, Expansion, HeadingEntry, InlineResolver, Verbatim,
};
