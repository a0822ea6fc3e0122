//! File records flowing through a build.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Extensions of design documents whose artboards get exported.
pub const DESIGN_EXTENSIONS: &[&str] = &["sketch"];

/// Extensions of vector artboards that carry specs.
pub const VECTOR_EXTENSIONS: &[&str] = &["svg"];

/// Extensions of images copied to the output as is.
pub const IMAGE_EXTENSIONS: &[&str] = &["gif", "jpg", "jpeg", "png", "svg"];

/// Extensions of markdown page sources.
pub const MARKUP_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkd", "mkdn", "mdwn"];

/// How a record takes part in a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Design document to export artboards from
    Design,
    /// Vector artboard: a spec source and an image
    Vector,
    /// Raster image
    Image,
    /// Markdown page source
    Markup,
    /// Anything else
    Other,
}

impl RecordKind {
    /// Classify a path by its extension.
    pub fn of(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        let ext = ext.as_str();

        if DESIGN_EXTENSIONS.contains(&ext) {
            Self::Design
        } else if VECTOR_EXTENSIONS.contains(&ext) {
            Self::Vector
        } else if IMAGE_EXTENSIONS.contains(&ext) {
            Self::Image
        } else if MARKUP_EXTENSIONS.contains(&ext) {
            Self::Markup
        } else {
            Self::Other
        }
    }

    /// Whether records of this kind are copied to the output as images.
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Vector | Self::Image)
    }
}

/// One input or output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// File path; identifies the record
    pub path: PathBuf,

    /// Directory the record was discovered under
    pub base: PathBuf,

    /// Raw contents
    pub contents: Vec<u8>,
}

impl FileRecord {
    /// Create a new record.
    pub fn new(path: impl Into<PathBuf>, base: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            base: base.into(),
            contents: contents.into(),
        }
    }

    /// Classify this record.
    pub fn kind(&self) -> RecordKind {
        RecordKind::of(&self.path)
    }

    /// Contents decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.contents)
    }

    /// Path relative to the record's base.
    pub fn relative(&self) -> &Path {
        self.path.strip_prefix(&self.base).unwrap_or(&self.path)
    }

    /// File name without extension.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Whether a partial identifier refers to this record.
    ///
    /// Matches the path itself or the path without its extension, either as
    /// given or relative to the record's base.
    pub fn matches(&self, identifier: &str) -> bool {
        let wanted = Path::new(identifier);

        [self.path.as_path(), self.relative()]
            .into_iter()
            .any(|path| path == wanted || path.with_extension("") == wanted)
    }

    /// Where the record lands under an output directory.
    pub fn output_path(&self, out_dir: &Path) -> PathBuf {
        if self.path.is_relative() {
            return out_dir.join(&self.path);
        }

        let relative = self.relative();
        if relative.is_relative() {
            return out_dir.join(relative);
        }

        match self.path.file_name() {
            Some(name) => out_dir.join(name),
            None => out_dir.to_path_buf(),
        }
    }
}
