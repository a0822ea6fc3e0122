//! Color and text style extraction from exported artboards.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::node::{closest_attr, AttributedNode};
use crate::svg::{SvgDocument, SvgNode};
use crate::types::{ColorSwatch, Specs, TextProps, TextStyle};

/// Extension of exported vector artboards.
pub const VECTOR_EXTENSION: &str = "svg";

/// Errors that can occur while extracting specs.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("Invalid SVG: {0}")]
    Xml(String),

    #[error("Text style '{style}' has no {attribute} on itself or any ancestor")]
    MissingAttribute {
        style: String,
        attribute: &'static str,
    },

    #[error("Text style '{style}' has a non-numeric {attribute}: {value:?}")]
    InvalidNumber {
        style: String,
        attribute: &'static str,
        value: String,
    },
}

/// Check whether a path names an exported vector artboard.
pub fn is_vector_asset(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(VECTOR_EXTENSION))
}

/// Extract specs from a file, or `None` when it is not a vector artboard.
pub fn specs_for_path(path: &Path, contents: &[u8]) -> Result<Option<Specs>, SpecError> {
    if !is_vector_asset(path) {
        return Ok(None);
    }

    specs_from_svg(contents).map(Some)
}

/// Parse SVG markup and extract its specs.
pub fn specs_from_svg(source: &[u8]) -> Result<Specs, SpecError> {
    let document = SvgDocument::parse(source)?;
    extract_specs(&document)
}

/// Extract swatches and text styles from a parsed artboard.
///
/// Swatches keep document order. Text styles are returned in reverse
/// document order, so the last text layer of the artboard comes first.
pub fn extract_specs(document: &SvgDocument) -> Result<Specs, SpecError> {
    let colors: Vec<ColorSwatch> = document
        .select("rect")
        .map(|rect| ColorSwatch {
            hex: rect.attr("fill").unwrap_or_default().to_string(),
            name: rect.attr("id").unwrap_or_default().to_string(),
        })
        .collect();

    let mut text_styles = document
        .select("text")
        .map(text_style)
        .collect::<Result<Vec<_>, _>>()?;

    text_styles.reverse();

    tracing::debug!(
        colors = colors.len(),
        text_styles = text_styles.len(),
        "Extracted specs"
    );

    Ok(Specs {
        colors,
        text_styles,
    })
}

fn text_style(node: SvgNode<'_>) -> Result<TextStyle, SpecError> {
    let name = node.attr("id").unwrap_or_default().to_string();

    let font_family = required(node, &name, "font-family")?
        .rsplit(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    let font_weight = required(node, &name, "font-weight")?.to_string();
    let font_size = required(node, &name, "font-size")?.to_string();

    let line_height = match closest_attr(node, "line-spacing") {
        Some(spacing) => {
            let spacing = parse_number(&name, "line-spacing", spacing)?;
            let size = parse_number(&name, "font-size", &font_size)?;
            Some(spacing / size)
        }
        None => None,
    };

    let props = TextProps {
        font_family,
        font_weight,
        font_size,
        line_height,
    };

    Ok(TextStyle {
        class_name: class_name(&name),
        inline_styles: props.to_inline_styles(),
        styles: props.to_styles(),
        name,
        props,
    })
}

fn required<'a>(
    node: SvgNode<'a>,
    style: &str,
    attribute: &'static str,
) -> Result<&'a str, SpecError> {
    closest_attr(node, attribute).ok_or_else(|| SpecError::MissingAttribute {
        style: style.to_string(),
        attribute,
    })
}

/// Parse the leading number of an attribute value, ignoring units.
fn parse_number(style: &str, attribute: &'static str, value: &str) -> Result<f64, SpecError> {
    static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("Invalid number regex")
    });

    NUMBER_RE
        .find(value.trim())
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| SpecError::InvalidNumber {
            style: style.to_string(),
            attribute,
            value: value.to_string(),
        })
}

/// Convert a layer name into a CSS class name.
pub fn class_name(name: &str) -> String {
    static SEPARATOR_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid separator regex"));

    SEPARATOR_RE
        .replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}
