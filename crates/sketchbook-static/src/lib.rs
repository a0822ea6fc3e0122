//! Static site generator for sketchbook style guides.
//!
//! Reads design artboards, images and markdown pages, extracts color and
//! typography specs from the artboards, and renders the pages to HTML with
//! the specs available to inline expressions.

pub mod builder;
pub mod export;
pub mod pipeline;
pub mod record;
pub mod renderer;
pub mod resolver;
pub mod stylesheet;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, SiteBuilder};
pub use export::{ArtboardExporter, DEFAULT_EXPORTER};
pub use record::{FileRecord, RecordKind};
pub use renderer::PageRenderer;
pub use resolver::RenderContext;
pub use templates::{is_template_path, validate_layout, Templates, TEMPLATE_EXTENSIONS};
