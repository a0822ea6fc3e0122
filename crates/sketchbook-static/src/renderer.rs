//! Page rendering over a stream of file records.

use sketchbook_markdown::extract_headings;
use sketchbook_specs::{asset_name, specs_for_path};

use crate::builder::BuildError;
use crate::record::{FileRecord, RecordKind};
use crate::resolver::RenderContext;
use crate::stylesheet::Stylesheet;
use crate::templates::{PageContext, Templates};

/// Renders markdown records into HTML pages.
///
/// Vector assets populate the specs context and markdown documents are
/// buffered; pages are rendered only once every record has been seen.
pub struct PageRenderer {
    templates: Templates,
    minify: bool,
    site_title: String,
}

impl PageRenderer {
    /// Create a renderer.
    pub fn new(templates: Templates, minify: bool, site_title: impl Into<String>) -> Self {
        Self {
            templates,
            minify,
            site_title: site_title.into(),
        }
    }

    /// Render every markdown record to an HTML record.
    pub fn render(&self, records: &[FileRecord]) -> Result<Vec<FileRecord>, BuildError> {
        let mut context = RenderContext::new(&self.templates);

        for record in records {
            match record.kind() {
                RecordKind::Vector => self.collect_specs(&mut context, record)?,
                RecordKind::Markup => {
                    tracing::debug!("Buffered page {}", record.path.display());
                    context.documents.push(record.clone());
                }
                _ => {}
            }
        }

        tracing::info!(
            "Collected specs from {} artboards, rendering {} pages",
            context.specs.len(),
            context.documents.len()
        );

        let stylesheet = Stylesheet::build(&context.specs, self.minify);

        context
            .documents
            .iter()
            .map(|document| self.render_page(&context, document, &stylesheet))
            .collect()
    }

    fn collect_specs(
        &self,
        context: &mut RenderContext<'_>,
        record: &FileRecord,
    ) -> Result<(), BuildError> {
        let specs = specs_for_path(&record.path, &record.contents).map_err(|source| {
            BuildError::ExtractError {
                path: record.path.display().to_string(),
                source,
            }
        })?;

        let (Some(specs), Some(name)) = (specs, asset_name(&record.path)) else {
            return Ok(());
        };

        tracing::debug!(
            "Extracted {} colors and {} text styles from {}",
            specs.colors.len(),
            specs.text_styles.len(),
            record.path.display()
        );

        if context.specs.insert(name.clone(), specs).is_some() {
            tracing::warn!(
                "Duplicate artboard name '{}': {} replaces the earlier one",
                name,
                record.path.display()
            );
        }

        Ok(())
    }

    fn render_page(
        &self,
        context: &RenderContext<'_>,
        document: &FileRecord,
        stylesheet: &str,
    ) -> Result<FileRecord, BuildError> {
        let body = context.render_document(document)?;
        let headings = extract_headings(&document.text());

        let title = headings
            .first()
            .map(|h| h.text.clone())
            .unwrap_or_else(|| document.stem());

        let html = self.templates.render_page(&PageContext {
            title,
            site_title: self.site_title.clone(),
            body,
            headings,
            stylesheet: stylesheet.to_string(),
        })?;

        let path = document.path.with_extension("html");
        tracing::debug!("Rendered {}", path.display());

        Ok(FileRecord::new(path, document.base.clone(), html))
    }
}
