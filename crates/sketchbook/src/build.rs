//! Style guide build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;
use sketchbook_static::{validate_layout, BuildConfig, BuildError, SiteBuilder, DEFAULT_EXPORTER};

/// Configuration file structure (sketchbook.toml).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    site: SiteConfig,
    #[serde(default)]
    build: BuildSettings,
}

#[derive(Debug, Deserialize)]
struct SiteConfig {
    #[serde(default = "default_title")]
    title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BuildSettings {
    #[serde(default = "default_output")]
    output: String,
    /// Custom page layout
    template: Option<String>,
    #[serde(default = "default_minify")]
    minify: bool,
    #[serde(default = "default_exporter")]
    exporter: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output: default_output(),
            template: None,
            minify: default_minify(),
            exporter: default_exporter(),
        }
    }
}

fn default_title() -> String {
    "Style Guide".to_string()
}
fn default_output() -> String {
    ".build".to_string()
}
fn default_minify() -> bool {
    true
}
fn default_exporter() -> String {
    DEFAULT_EXPORTER.to_string()
}

/// Command line options for a build.
#[derive(Debug, Default)]
pub struct Options {
    pub inputs: Vec<String>,
    pub output: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub config: PathBuf,
    pub minify: Option<bool>,
}

/// Load configuration from the config file if it exists.
/// Returns an error if the config file exists but is malformed.
fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

/// Merge command line options over the config file.
fn build_config(file: ConfigFile, options: &Options) -> BuildConfig {
    BuildConfig {
        output_dir: options
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&file.build.output)),
        layout: options
            .template
            .clone()
            .or_else(|| file.build.template.map(PathBuf::from)),
        minify: options.minify.unwrap_or(file.build.minify),
        site_title: file.site.title,
        exporter: file.build.exporter,
    }
}

/// Run the build command.
pub async fn run(options: Options) -> Result<()> {
    if options.inputs.is_empty() {
        return Err(BuildError::MissingInputs.into());
    }

    let file_config = load_config(&options.config)?;
    let config = build_config(file_config, &options);

    if let Some(layout) = &config.layout {
        validate_layout(layout)?;
    }

    tracing::info!("Building style guide...");

    let result = SiteBuilder::new(config)?.build(&options.inputs).await?;

    tracing::info!(
        "Built {} pages and copied {} images ({} exported) in {}ms",
        result.pages,
        result.images,
        result.assets,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_without_config_file() {
        let temp = tempdir().unwrap();
        let file = load_config(&temp.path().join("sketchbook.toml")).unwrap();
        let config = build_config(file, &Options::default());

        assert_eq!(config.output_dir, PathBuf::from(".build"));
        assert_eq!(config.layout, None);
        assert!(config.minify);
        assert_eq!(config.site_title, "Style Guide");
        assert_eq!(config.exporter, "sketchtool");
    }

    #[test]
    fn reads_config_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sketchbook.toml");
        fs::write(
            &path,
            r#"
[site]
title = "Acme Design"

[build]
output = "public"
template = "layout.html"
minify = false
exporter = "/opt/sketch/bin/sketchtool"
"#,
        )
        .unwrap();

        let config = build_config(load_config(&path).unwrap(), &Options::default());

        assert_eq!(config.output_dir, PathBuf::from("public"));
        assert_eq!(config.layout, Some(PathBuf::from("layout.html")));
        assert!(!config.minify);
        assert_eq!(config.site_title, "Acme Design");
        assert_eq!(config.exporter, "/opt/sketch/bin/sketchtool");
    }

    #[test]
    fn flags_override_config_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sketchbook.toml");
        fs::write(&path, "[build]\noutput = \"public\"\nminify = true\n").unwrap();

        let options = Options {
            output: Some(PathBuf::from("site")),
            template: Some(PathBuf::from("custom.jinja")),
            minify: Some(false),
            ..Default::default()
        };
        let config = build_config(load_config(&path).unwrap(), &options);

        assert_eq!(config.output_dir, PathBuf::from("site"));
        assert_eq!(config.layout, Some(PathBuf::from("custom.jinja")));
        assert!(!config.minify);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("sketchbook.toml");
        fs::write(&path, "[build\noutput = ").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[tokio::test]
    async fn requires_inputs() {
        let err = run(Options::default()).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::MissingInputs)
        ));
    }

    #[tokio::test]
    async fn rejects_invalid_template_before_building() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("site");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("index.md"), "# Hello").unwrap();

        let err = run(Options {
            inputs: vec![docs.display().to_string()],
            output: Some(out.clone()),
            template: Some(temp.path().join("layout.hbs")),
            config: temp.path().join("sketchbook.toml"),
            minify: None,
        })
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::InvalidTemplate { .. })
        ));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn builds_site() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("site");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("index.md"), "# Hello").unwrap();

        run(Options {
            inputs: vec![docs.display().to_string()],
            output: Some(out.clone()),
            template: None,
            config: temp.path().join("sketchbook.toml"),
            minify: None,
        })
        .await
        .unwrap();

        assert!(out.join("index.html").exists());
    }
}
