//! Static site builder.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use sketchbook_specs::SpecError;

use crate::export::{ArtboardExporter, DEFAULT_EXPORTER};
use crate::pipeline::{images, read_inputs, rebase, write_records};
use crate::renderer::PageRenderer;
use crate::templates::Templates;

/// Configuration for building a style guide site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Output directory
    pub output_dir: PathBuf,

    /// Custom page layout template
    pub layout: Option<PathBuf>,

    /// Minify the site stylesheet
    pub minify: bool,

    /// Site title
    pub site_title: String,

    /// Program used to export design documents
    pub exporter: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(".build"),
            layout: None,
            minify: true,
            site_title: "Style Guide".to_string(),
            exporter: DEFAULT_EXPORTER.to_string(),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Number of artboards exported from design documents
    pub assets: usize,

    /// Number of images copied, exported artboards included
    pub images: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("No input files given")]
    MissingInputs,

    #[error("Invalid template {path}: expected one of {expected}")]
    InvalidTemplate { path: String, expected: String },

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("Failed to extract specs: {path}: {source}")]
    ExtractError { path: String, source: SpecError },

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to read input: {0}")]
    ReadError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Invalid input pattern: {0}")]
    PatternError(String),

    #[error("Export tool '{0}' is not available")]
    ToolUnavailable(String),

    #[error("Failed to export artboards: {path}: {message}")]
    ExportError { path: String, message: String },
}

/// Style guide site builder.
pub struct SiteBuilder {
    config: BuildConfig,
    renderer: PageRenderer,
    exporter: ArtboardExporter,
}

impl SiteBuilder {
    /// Create a new builder, compiling the configured layout.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        let templates = Templates::with_layout(config.layout.as_deref())?;
        let renderer = PageRenderer::new(templates, config.minify, config.site_title.clone());
        let exporter = ArtboardExporter::new(config.exporter.clone());

        Ok(Self {
            config,
            renderer,
            exporter,
        })
    }

    /// Build the site from input files, directories and glob patterns.
    pub async fn build(&self, patterns: &[String]) -> Result<BuildResult, BuildError> {
        if patterns.is_empty() {
            return Err(BuildError::MissingInputs);
        }

        let start = Instant::now();

        let mut records = read_inputs(patterns)?;
        tracing::info!("Read {} input files", records.len());

        let assets = self.exporter.export(&records).await?;
        let exported = assets.len();
        records.extend(assets);

        let pages = self.renderer.render(&records)?;
        let images = images(&records);

        let (page_count, image_count) = (pages.len(), images.len());

        let mut outputs = pages;
        outputs.extend(images);
        let outputs = rebase(outputs, patterns);

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        write_records(&outputs, &self.config.output_dir)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: page_count,
            assets: exported,
            images: image_count,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }
}
