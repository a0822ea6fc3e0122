//! Sketchbook CLI - style guides from design artboards and markdown pages.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod build;

#[derive(Parser)]
#[command(name = "sketchbook")]
#[command(about = "Build a style guide site from design files, images and markdown")]
#[command(version)]
pub struct Cli {
    /// Input files, directories or glob patterns
    inputs: Vec<String>,

    /// Output directory (defaults to config or ".build")
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Page layout template (.html, .htm, .jinja, .jinja2 or .j2)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Path to sketchbook.toml config file
    #[arg(short, long, default_value = "sketchbook.toml")]
    config: PathBuf,

    /// Skip stylesheet minification
    #[arg(long)]
    no_minify: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let minify = if cli.no_minify { Some(false) } else { None };

    build::run(build::Options {
        inputs: cli.inputs,
        output: cli.output,
        template: cli.template,
        config: cli.config,
        minify,
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from([
            "sketchbook",
            "docs/**",
            "designs",
            "-o",
            "site",
            "-t",
            "layout.html",
            "--no-minify",
            "-v",
        ]);

        assert_eq!(cli.inputs, vec!["docs/**", "designs"]);
        assert_eq!(cli.output, Some(PathBuf::from("site")));
        assert_eq!(cli.template, Some(PathBuf::from("layout.html")));
        assert_eq!(cli.config, PathBuf::from("sketchbook.toml"));
        assert!(cli.no_minify);
        assert!(cli.verbose);
    }

    #[test]
    fn inputs_are_optional_for_the_parser() {
        let cli = Cli::parse_from(["sketchbook"]);

        assert!(cli.inputs.is_empty());
        assert_eq!(cli.output, None);
    }
}
