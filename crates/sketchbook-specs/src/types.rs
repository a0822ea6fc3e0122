//! Spec types extracted from vector artboards.

use serde::Serialize;

/// Colors and text styles extracted from one artboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Specs {
    /// Swatches in document order
    pub colors: Vec<ColorSwatch>,

    /// Text styles, last-declared first
    pub text_styles: Vec<TextStyle>,
}

/// A named color taken from a rectangle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColorSwatch {
    /// Fill value as written in the artboard (not validated)
    pub hex: String,

    /// Layer id
    pub name: String,
}

/// A named typography declaration taken from a text layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Layer id
    pub name: String,

    /// CSS-safe slug of `name`
    pub class_name: String,

    /// Resolved font properties
    pub props: TextProps,

    /// Declarations on one line: `font-family: "Georgia"; font-size: 14px;`
    pub inline_styles: String,

    /// Declarations one per line
    pub styles: String,
}

/// Font properties of a text style, in serialization order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    pub font_family: String,
    pub font_weight: String,
    pub font_size: String,

    /// Ratio of line spacing to font size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
}

impl TextProps {
    /// Property names paired with their CSS values, in insertion order.
    pub fn declarations(&self) -> Vec<(String, String)> {
        let mut declarations = vec![
            (
                decamelize("fontFamily"),
                format!("\"{}\"", self.font_family),
            ),
            (decamelize("fontWeight"), self.font_weight.clone()),
            (decamelize("fontSize"), format!("{}px", self.font_size)),
        ];

        if let Some(line_height) = self.line_height {
            declarations.push((decamelize("lineHeight"), line_height.to_string()));
        }

        declarations
    }

    /// Serialize as a single-line declaration block.
    pub fn to_inline_styles(&self) -> String {
        self.declarations()
            .iter()
            .map(|(key, value)| format!("{}: {};", key, value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Serialize with one declaration per line.
    pub fn to_styles(&self) -> String {
        self.declarations()
            .iter()
            .map(|(key, value)| format!("{}: {};", key, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Convert a camelCase key to its dash-separated CSS form.
pub fn decamelize(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_uppercase() {
            out.push('-');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
