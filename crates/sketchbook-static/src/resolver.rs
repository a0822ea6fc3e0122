//! Inline expression resolution against a render pass.

use std::path::Path;

use serde_json::Value;
use sketchbook_markdown::{render_html, Expansion, Expression, ExpressionKind, InlineResolver};
use sketchbook_specs::SpecsContext;

use crate::builder::BuildError;
use crate::record::FileRecord;
use crate::templates::Templates;

/// Everything a render pass can read while pages are rendered.
pub struct RenderContext<'a> {
    /// Specs of every vector asset in the pass
    pub specs: SpecsContext,

    /// Markup documents in the pass, available as partials
    pub documents: Vec<FileRecord>,

    /// Registered templates
    pub templates: &'a Templates,
}

impl<'a> RenderContext<'a> {
    /// Create an empty context.
    pub fn new(templates: &'a Templates) -> Self {
        Self {
            specs: SpecsContext::new(),
            documents: Vec::new(),
            templates,
        }
    }

    /// Find the document a partial identifier refers to.
    pub fn find_document(&self, identifier: &str) -> Option<&FileRecord> {
        self.documents.iter().find(|doc| doc.matches(identifier))
    }

    /// Render a document's markdown body to HTML, expanding inline expressions.
    pub fn render_document(&self, document: &FileRecord) -> Result<String, BuildError> {
        let resolver = PageResolver {
            context: self,
            stack: vec![document.path.as_path()],
        };

        render_html(&document.text(), &resolver)
    }
}

/// Resolver for one document, tracking the partials currently being rendered.
struct PageResolver<'c, 'a> {
    context: &'c RenderContext<'a>,
    stack: Vec<&'c Path>,
}

impl PageResolver<'_, '_> {
    fn partial(&self, identifier: &str) -> Result<Expansion, BuildError> {
        let Some(document) = self.context.find_document(identifier) else {
            tracing::warn!("Partial '{}' not found", identifier);
            return Ok(Expansion::Text(format!("Partial '{}' not found", identifier)));
        };

        if self.stack.contains(&document.path.as_path()) {
            tracing::warn!("Partial '{}' includes itself", identifier);
            return Ok(Expansion::Text(format!(
                "Partial '{}' includes itself",
                identifier
            )));
        }

        let mut stack = self.stack.clone();
        stack.push(document.path.as_path());

        let nested = PageResolver {
            context: self.context,
            stack,
        };

        render_html(&document.text(), &nested).map(Expansion::Html)
    }

    fn data(&self, template: Option<&str>, path: &str) -> Result<Expansion, BuildError> {
        let value = self.context.specs.lookup(path);

        match template {
            Some(name) => self
                .context
                .templates
                .render_data(name, value.as_ref())
                .map(Expansion::Html),
            None => Ok(Expansion::Text(display_value(value.as_ref()))),
        }
    }
}

impl InlineResolver for PageResolver<'_, '_> {
    type Error = BuildError;

    fn resolve(&self, expression: &Expression<'_>) -> Result<Expansion, BuildError> {
        match expression.kind {
            ExpressionKind::Partial { path } => self.partial(path),
            ExpressionKind::Data { template, path } => self.data(template, path),
        }
    }
}

/// Text for a data value inserted without a template.
fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sketchbook_specs::{ColorSwatch, Specs};

    fn context(templates: &Templates) -> RenderContext<'_> {
        let mut context = RenderContext::new(templates);
        context.specs.insert(
            "Palette",
            Specs {
                colors: vec![ColorSwatch {
                    hex: "#2069B4".to_string(),
                    name: "blue400".to_string(),
                }],
                text_styles: vec![],
            },
        );
        context.documents = vec![
            FileRecord::new("header1.md", "", "# Hello"),
            FileRecord::new("header2.md", "", "# Hello"),
            FileRecord::new("header3.md", "", "# Hello"),
            FileRecord::new("docs/partials/nested-header.md", "docs", "# Hello"),
            FileRecord::new("loop.md", "", "Again {{> loop}}"),
        ];
        context
    }

    fn render(context: &RenderContext<'_>, source: &str) -> String {
        context
            .render_document(&FileRecord::new("index.md", "", source))
            .unwrap()
    }

    #[test]
    fn resolves_partials() {
        let templates = Templates::new();
        let context = context(&templates);

        let html = render(
            &context,
            "{{> header1}} {{> header2 }} {{ > header3 }} {{> partials/nested-header }} {{> 404}}",
        );

        assert_eq!(html.matches("<h1 id=\"hello\">Hello</h1>").count(), 4);
        assert!(html.contains("Partial '404' not found"));
    }

    #[test]
    fn resolves_quoted_partials() {
        let templates = Templates::new();
        let context = context(&templates);

        let html = render(&context, "{{> 'header1' }} {{> \"partials/nested-header.md\"}}");

        assert_eq!(html.matches("<h1 id=\"hello\">Hello</h1>").count(), 2);
    }

    #[test]
    fn stops_recursive_partials() {
        let templates = Templates::new();
        let context = context(&templates);

        let html = render(&context, "{{> loop}}");

        assert!(html.contains("Again"));
        assert!(html.contains("Partial 'loop' includes itself"));
    }

    #[test]
    fn renders_data_through_templates() {
        let templates = Templates::new();
        let context = context(&templates);

        let html = render(&context, "{{ colors: Palette }}");

        assert!(html.contains(
            "<code style=\"background-color: #2069B4\" class=\"colors__swatch\">#2069B4</code>"
        ));
    }

    #[test]
    fn inserts_raw_data_as_text() {
        let templates = Templates::new();
        let context = context(&templates);

        assert_eq!(
            render(&context, "Primary: {{ Palette.colors.0.hex }}"),
            "<p>Primary: #2069B4</p>\n"
        );
        assert_eq!(render(&context, "Missing: {{ Nowhere.colors }}"), "<p>Missing: </p>\n");
        assert_eq!(
            render(&context, "{{ Palette.textStyles }}"),
            "<p>[]</p>\n"
        );
    }

    #[test]
    fn unknown_template_is_fatal() {
        let templates = Templates::new();
        let context = context(&templates);

        let result = context.render_document(&FileRecord::new("index.md", "", "{{ gradients: Palette }}"));

        assert!(matches!(result, Err(BuildError::UnknownTemplate(name)) if name == "gradients"));
    }

    #[test]
    fn display_values() {
        assert_eq!(display_value(None), "");
        assert_eq!(display_value(Some(&Value::Null)), "");
        assert_eq!(display_value(Some(&serde_json::json!(1.5))), "1.5");
        assert_eq!(display_value(Some(&serde_json::json!(true))), "true");
        assert_eq!(display_value(Some(&serde_json::json!({"a": 1}))), "{\"a\":1}");
    }
}
