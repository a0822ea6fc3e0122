//! Artboard export through an external design tool.

use std::fs;
use std::io;

use tokio::process::Command;
use walkdir::WalkDir;

use crate::builder::BuildError;
use crate::record::{FileRecord, RecordKind};

/// Program used to export artboards unless configured otherwise.
pub const DEFAULT_EXPORTER: &str = "sketchtool";

/// Exports the artboards of design documents as SVG records.
#[derive(Debug, Clone)]
pub struct ArtboardExporter {
    program: String,
}

impl ArtboardExporter {
    /// Create an exporter invoking `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Export every design record.
    ///
    /// Exported artboards are placed next to their design document and share
    /// its base. The tool is never invoked when there is nothing to export.
    pub async fn export(&self, records: &[FileRecord]) -> Result<Vec<FileRecord>, BuildError> {
        let mut exported = Vec::new();

        for design in records.iter().filter(|r| r.kind() == RecordKind::Design) {
            let artboards = self.export_design(design).await?;
            tracing::info!(
                "Exported {} artboards from {}",
                artboards.len(),
                design.path.display()
            );
            exported.extend(artboards);
        }

        Ok(exported)
    }

    async fn export_design(&self, design: &FileRecord) -> Result<Vec<FileRecord>, BuildError> {
        let staging = tempfile::tempdir().map_err(|e| BuildError::WriteError(e.to_string()))?;

        let output = Command::new(&self.program)
            .arg("export")
            .arg("artboards")
            .arg(&design.path)
            .arg("--formats=svg")
            .arg(format!("--output={}", staging.path().display()))
            .output()
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => BuildError::ToolUnavailable(self.program.clone()),
                _ => BuildError::ExportError {
                    path: design.path.display().to_string(),
                    message: e.to_string(),
                },
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BuildError::ExportError {
                path: design.path.display().to_string(),
                message: format!("{} ({})", stderr.trim(), output.status),
            });
        }

        let dir = design.path.parent().map(|p| p.to_path_buf()).unwrap_or_default();

        let mut artboards = Vec::new();
        for entry in WalkDir::new(staging.path())
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let relative = entry
                .path()
                .strip_prefix(staging.path())
                .unwrap_or(entry.path());

            let contents = fs::read(entry.path())
                .map_err(|e| BuildError::ReadError(format!("{}: {}", entry.path().display(), e)))?;

            tracing::debug!("Exported artboard {}", relative.display());
            artboards.push(FileRecord::new(dir.join(relative), design.base.clone(), contents));
        }

        Ok(artboards)
    }
}

impl Default for ArtboardExporter {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING_TOOL: &str = "sketchbook-test-missing-exporter";

    #[tokio::test]
    async fn skips_tool_without_designs() {
        let exporter = ArtboardExporter::new(MISSING_TOOL);
        let records = vec![
            FileRecord::new("index.md", "", "# Hi"),
            FileRecord::new("Palette.svg", "", "<svg/>"),
        ];

        let exported = exporter.export(&records).await.unwrap();

        assert!(exported.is_empty());
    }

    #[tokio::test]
    async fn missing_tool_is_unavailable() {
        let exporter = ArtboardExporter::new(MISSING_TOOL);
        let records = vec![FileRecord::new("Design.sketch", "", "")];

        let result = exporter.export(&records).await;

        assert!(matches!(result, Err(BuildError::ToolUnavailable(program)) if program == MISSING_TOOL));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_tool_is_an_export_error() {
        let exporter = ArtboardExporter::new("false");
        let records = vec![FileRecord::new("Design.sketch", "", "")];

        let result = exporter.export(&records).await;

        assert!(matches!(result, Err(BuildError::ExportError { path, .. }) if path == "Design.sketch"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_tool_without_output_exports_nothing() {
        let exporter = ArtboardExporter::new("true");
        let records = vec![FileRecord::new("designs/Design.sketch", "designs", "")];

        let exported = exporter.export(&records).await.unwrap();

        assert!(exported.is_empty());
    }

    #[test]
    fn defaults_to_sketchtool() {
        assert_eq!(ArtboardExporter::default().program, DEFAULT_EXPORTER);
    }
}
