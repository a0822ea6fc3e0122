//! Template engine for rendering pages and design data.

use std::fs;
use std::io;
use std::path::Path;

use minijinja::{context, AutoEscape, Environment, ErrorKind};
use serde_json::{Map, Value};
use sketchbook_markdown::HeadingEntry;

use crate::builder::BuildError;

/// Extensions accepted for a custom layout template.
pub const TEMPLATE_EXTENSIONS: &[&str] = &["html", "htm", "jinja", "jinja2", "j2"];

/// Name of the page layout template.
pub const LAYOUT: &str = "layout";

/// Check whether a path has a template extension.
pub fn is_template_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| TEMPLATE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Validate a custom layout path before a build starts.
pub fn validate_layout(path: &Path) -> Result<(), BuildError> {
    if !is_template_path(path) {
        return Err(BuildError::InvalidTemplate {
            path: path.display().to_string(),
            expected: TEMPLATE_EXTENSIONS.join(", "),
        });
    }

    if !path.is_file() {
        return Err(BuildError::TemplateNotFound(path.display().to_string()));
    }

    Ok(())
}

/// Context for rendering a page layout.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PageContext {
    /// Page title
    pub title: String,
    /// Site title
    pub site_title: String,
    /// Rendered body HTML
    pub body: String,
    /// Headings of the page source
    pub headings: Vec<HeadingEntry>,
    /// Site stylesheet
    pub stylesheet: String,
}

/// Named templates using minijinja.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Create an engine with the bundled `colors`, `styles` and `layout` templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);

        env.add_template_owned("colors".to_string(), COLORS_TEMPLATE.to_string())
            .expect("Failed to add colors template");

        env.add_template_owned("styles".to_string(), STYLES_TEMPLATE.to_string())
            .expect("Failed to add styles template");

        env.add_template_owned(LAYOUT.to_string(), LAYOUT_TEMPLATE.to_string())
            .expect("Failed to add layout template");

        Self { env }
    }

    /// Create an engine, replacing the bundled layout with a custom one.
    ///
    /// A path without a template extension is ignored and the bundled layout
    /// is kept.
    pub fn with_layout(layout: Option<&Path>) -> Result<Self, BuildError> {
        let mut templates = Self::new();

        let Some(path) = layout else {
            return Ok(templates);
        };

        if !is_template_path(path) {
            tracing::warn!(
                "Ignoring layout {}: not a template file",
                path.display()
            );
            return Ok(templates);
        }

        let source = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => BuildError::TemplateNotFound(path.display().to_string()),
            _ => BuildError::ReadError(format!("{}: {}", path.display(), e)),
        })?;

        templates
            .env
            .add_template_owned(LAYOUT.to_string(), source)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        tracing::info!("Using custom layout {}", path.display());

        Ok(templates)
    }

    /// Render design data through a named template.
    ///
    /// An object's keys are available directly, and the whole value is
    /// always available as `data`.
    pub fn render_data(&self, name: &str, data: Option<&Value>) -> Result<String, BuildError> {
        let tmpl = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => BuildError::UnknownTemplate(name.to_string()),
            _ => BuildError::TemplateError(e.to_string()),
        })?;

        let mut ctx = Map::new();
        if let Some(value) = data {
            if let Value::Object(fields) = value {
                ctx.extend(fields.clone());
            }
            ctx.insert("data".to_string(), value.clone());
        }

        tmpl.render(&ctx)
            .map_err(|e| BuildError::TemplateError(format!("{}: {}", name, e)))
    }

    /// Render a page with the layout template.
    pub fn render_page(&self, page: &PageContext) -> Result<String, BuildError> {
        let tmpl = self
            .env
            .get_template(LAYOUT)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        tmpl.render(context! {
            title => &page.title,
            site_title => &page.site_title,
            body => &page.body,
            headings => &page.headings,
            stylesheet => &page.stylesheet,
        })
        .map_err(|e| BuildError::TemplateError(format!("{}: {}", LAYOUT, e)))
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

const COLORS_TEMPLATE: &str = r##"{% set swatches = colors if colors is defined else data %}<div class="colors">
{% for swatch in swatches %}  <figure class="colors__item">
    <div class="colors__sample" style="background-color: {{ swatch.hex }}"></div>
    <figcaption class="colors__caption">
      <span class="colors__name">{{ swatch.name }}</span>
      <code style="background-color: {{ swatch.hex }}" class="colors__swatch">{{ swatch.hex }}</code>
    </figcaption>
  </figure>
{% endfor %}</div>"##;

const STYLES_TEMPLATE: &str = r##"{% set styles = textStyles if textStyles is defined else data %}<div class="styles">
{% for style in styles %}  <div class="styles__item">
    <h4 class="styles__name" style="{{ style.inlineStyles }}">{{ style.name }}</h4>
    <pre class="styles__code"><code>.{{ style.className }} {
{{ style.styles }}
}</code></pre>
  </div>
{% endfor %}</div>"##;

const LAYOUT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% if site_title %}{{ title }} - {{ site_title }}{% else %}{{ title }}{% endif %}</title>
  <style>{{ stylesheet | safe }}</style>
</head>
<body>
  <div class="layout">
{% if headings %}    <nav class="toc">
      <ul>
{% for heading in headings %}        <li class="toc__item toc__item--{{ heading.tag }}"><a href="#{{ heading.anchor }}">{{ heading.text }}</a></li>
{% endfor %}      </ul>
    </nav>
{% endif %}    <main class="content">
{{ body | safe }}
    </main>
  </div>
</body>
</html>"##;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn page(body: &str) -> PageContext {
        PageContext {
            title: "Colors".to_string(),
            site_title: "Style Guide".to_string(),
            body: body.to_string(),
            headings: vec![HeadingEntry {
                text: "Colors".to_string(),
                anchor: "colors".to_string(),
                tag: "h1".to_string(),
            }],
            stylesheet: ".h1 { font-size: 64px; }".to_string(),
        }
    }

    #[test]
    fn renders_layout() {
        let templates = Templates::new();
        let html = templates
            .render_page(&page("<h1 id=\"colors\">Colors</h1>"))
            .unwrap();

        assert!(html.contains("<title>Colors - Style Guide</title>"));
        assert!(html.contains("<h1 id=\"colors\">Colors</h1>"));
        assert!(html.contains("<a href=\"#colors\">Colors</a>"));
        assert!(html.contains("<style>.h1 { font-size: 64px; }</style>"));
    }

    #[test]
    fn renders_color_swatches() {
        let templates = Templates::new();
        let specs = json!({
            "colors": [{ "hex": "#2069B4", "name": "blue400" }],
            "textStyles": [],
        });

        let html = templates.render_data("colors", Some(&specs)).unwrap();

        assert!(html.contains(
            "<code style=\"background-color: #2069B4\" class=\"colors__swatch\">#2069B4</code>"
        ));
        assert!(html.contains("blue400"));
    }

    #[test]
    fn renders_swatch_lists() {
        let templates = Templates::new();
        let colors = json!([{ "hex": "#FFFFFF", "name": "white" }]);

        let html = templates.render_data("colors", Some(&colors)).unwrap();

        assert!(html.contains("class=\"colors__swatch\">#FFFFFF</code>"));
    }

    #[test]
    fn renders_text_styles_escaped() {
        let templates = Templates::new();
        let specs = json!({
            "colors": [],
            "textStyles": [{
                "name": "h1",
                "className": "h1",
                "inlineStyles": "font-family: \"Helvetica Neue\"; font-size: 64px;",
                "styles": "font-family: \"Helvetica Neue\";\nfont-size: 64px;",
            }],
        });

        let html = templates.render_data("styles", Some(&specs)).unwrap();

        assert!(html.contains(
            "<h4 class=\"styles__name\" style=\"font-family: &quot;Helvetica Neue&quot;; font-size: 64px;\">h1</h4>"
        ));
    }

    #[test]
    fn renders_absent_data_as_empty() {
        let templates = Templates::new();
        let html = templates.render_data("colors", None).unwrap();

        assert!(html.contains("<div class=\"colors\">"));
        assert!(!html.contains("colors__item"));
    }

    #[test]
    fn unknown_template_is_an_error() {
        let templates = Templates::new();
        let result = templates.render_data("gradients", None);

        assert!(matches!(result, Err(BuildError::UnknownTemplate(name)) if name == "gradients"));
        assert!(templates.render_data("styles", None).is_ok());
    }

    #[test]
    fn uses_custom_layout() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("layout.html");
        fs::write(&path, "<custom>{{ body | safe }}</custom>").unwrap();

        let templates = Templates::with_layout(Some(&path)).unwrap();
        let html = templates.render_page(&page("<p>Hi</p>")).unwrap();

        assert_eq!(html, "<custom><p>Hi</p></custom>");
    }

    #[test]
    fn missing_custom_layout_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("missing.html");

        let result = Templates::with_layout(Some(&path));

        assert!(matches!(result, Err(BuildError::TemplateNotFound(_))));
    }

    #[test]
    fn ignores_non_template_layout() {
        let templates = Templates::with_layout(Some(Path::new("layout.txt"))).unwrap();
        let html = templates.render_page(&page("")).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn validates_layout_paths() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("layout.jinja");
        fs::write(&path, "{{ body }}").unwrap();

        assert!(validate_layout(&path).is_ok());
        assert!(matches!(
            validate_layout(Path::new("layout.hbs")),
            Err(BuildError::InvalidTemplate { .. })
        ));
        assert!(matches!(
            validate_layout(&temp.path().join("other.html")),
            Err(BuildError::TemplateNotFound(_))
        ));
    }
}
