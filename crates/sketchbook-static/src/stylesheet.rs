//! Site stylesheet generation.

use std::fmt::Write as _;

use sketchbook_specs::SpecsContext;

/// Stylesheet utilities.
pub struct Stylesheet;

impl Stylesheet {
    /// Generate the site stylesheet: the theme followed by one class per text style.
    pub fn generate(specs: &SpecsContext) -> String {
        let mut css = THEME_CSS.to_string();

        for (name, artboard) in specs.iter() {
            if artboard.text_styles.is_empty() {
                continue;
            }

            let _ = writeln!(css, "\n/* {} */", name.replace("*/", "* /"));
            for style in &artboard.text_styles {
                if style.class_name.is_empty() {
                    continue;
                }

                let _ = writeln!(css, ".{} {{", style.class_name);
                for (key, value) in style.props.declarations() {
                    let _ = writeln!(css, "  {}: {};", key, value);
                }
                css.push_str("}\n");
            }
        }

        css
    }

    /// Generate the stylesheet, minified when requested.
    ///
    /// Falls back to the unminified stylesheet if minification fails.
    pub fn build(specs: &SpecsContext, minify: bool) -> String {
        let css = Self::generate(specs);
        if !minify {
            return css;
        }

        match Self::minify_css(&css) {
            Ok(minified) => minified,
            Err(e) => {
                tracing::warn!("Failed to minify stylesheet: {}", e);
                css
            }
        }
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const THEME_CSS: &str = r#"/* Sketchbook style guide theme */

:root {
  --toc-width: 220px;
  --content-max-width: 860px;
  --foreground: #1f2328;
  --muted: #f6f8fa;
  --border: #d0d7de;
  --accent: #2069b4;
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, "Helvetica Neue", sans-serif;
  color: var(--foreground);
  line-height: 1.6;
}

.layout {
  display: grid;
  grid-template-columns: var(--toc-width) 1fr;
  min-height: 100vh;
}

/* Table of contents */
.toc {
  background: var(--muted);
  border-right: 1px solid var(--border);
  padding: 1.5rem;
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
}

.toc ul {
  list-style: none;
  margin: 0;
  padding: 0;
}

.toc a {
  display: block;
  padding: 0.25rem 0;
  color: var(--foreground);
  text-decoration: none;
}

.toc__item--h2 { padding-left: 0.75rem; }
.toc__item--h3 { padding-left: 1.5rem; }
.toc__item--h4,
.toc__item--h5,
.toc__item--h6 { padding-left: 2.25rem; }

/* Page content */
.content {
  max-width: var(--content-max-width);
  padding: 2rem;
}

.content a {
  color: var(--accent);
}

.content img {
  max-width: 100%;
}

.content pre {
  background: var(--muted);
  border: 1px solid var(--border);
  border-radius: 0.375rem;
  padding: 1rem;
  overflow-x: auto;
}

/* Color swatches */
.colors {
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(160px, 1fr));
  gap: 1rem;
  margin: 1rem 0;
}

.colors__item {
  margin: 0;
  border: 1px solid var(--border);
  border-radius: 0.375rem;
  overflow: hidden;
}

.colors__sample {
  height: 96px;
}

.colors__caption {
  display: flex;
  flex-direction: column;
  padding: 0.5rem;
}

.colors__swatch {
  color: #fff;
  padding: 0 0.25rem;
  border-radius: 0.25rem;
  align-self: flex-start;
}

/* Text styles */
.styles__item {
  border-bottom: 1px solid var(--border);
  padding: 1rem 0;
}

.styles__name {
  margin: 0 0 0.5rem;
}
"#;
