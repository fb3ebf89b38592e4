//! CLI module - Command-line interface definition, validation and the run handler

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::model::RenderContext;
use crate::core::render::{Glyphs, OutputFormat, RenderConfig, Renderer, TreeStats};
use crate::core::style::Styler;
use crate::core::tree::TreeRenderer;

/// dirtree - print a directory subtree as a tree diagram.
#[derive(Parser, Debug)]
#[command(name = "dirtree")]
#[command(
    about,
    long_about = r#"dirtree prints the directory subtree under PATH as a tree diagram.

Directories are listed before files at every level, and names are ordered
case-insensitively. Directories that cannot be read are shown as an error line
in place of their contents; the rest of the tree is still printed.

Output formats:
- text: styled tree diagram (default)
- json: a single JSON array of line objects
- jsonl: one JSON line object per tree line

Examples:
    dirtree .
    dirtree ~/projects --ascii --no-color
    dirtree src --format jsonl
"#
)]
pub struct Cli {
    /// Directory to render.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Disable colored output.
    #[arg(
        long,
        long_help = "Disable colored output. Colors are also disabled when the NO_COLOR\n\
environment variable is set to a non-empty value, or when stdout is not a terminal."
    )]
    pub no_color: bool,

    /// Draw the tree with ASCII characters only.
    #[arg(
        long,
        long_help = "Draw connectors with ASCII characters (|-- and `--) and omit the\n\
directory/file markers. Useful for terminals without Unicode fonts."
    )]
    pub ascii: bool,

    /// Output format (text/json/jsonl).
    #[arg(
        long,
        default_value = "text",
        value_parser = ["text", "json", "jsonl"],
        value_name = "FORMAT"
    )]
    pub format: String,

    /// Pretty-print JSON output with indentation.
    #[arg(
        long,
        long_help = "Pretty-print the --format json array with indentation. Has no effect on\n\
text output, and jsonl always keeps one object per line."
    )]
    pub pretty: bool,

    /// Verbose mode (traversal diagnostics on stderr).
    #[arg(
        short,
        long,
        long_help = "Log traversal diagnostics to stderr, including every directory listed and\n\
every directory that could not be read. RUST_LOG overrides the level."
    )]
    pub verbose: bool,
}

/// Pre-flight validation failures for the root path
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Check that `path` exists and is a directory
pub fn validate_root(path: &Path) -> Result<(), CliError> {
    if !path.exists() {
        return Err(CliError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(CliError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli, styler: Styler) -> Result<TreeStats> {
    validate_root(&cli.path)?;

    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let config = RenderConfig {
        format,
        glyphs: Glyphs::for_ascii(cli.ascii),
        styler,
        pretty: cli.pretty,
    };
    debug!(root = %cli.path.display(), ?format, ascii = cli.ascii, "rendering tree");

    let tree = TreeRenderer::new();
    let renderer = Renderer::with_config(config);
    let writer = BufWriter::new(io::stdout().lock());

    // A JSON array is written whole; the other formats stream line by line
    let stats = match format {
        OutputFormat::Json => {
            renderer.write_tree(&cli.path, tree.collect_lines(&cli.path), writer)
        }
        OutputFormat::Text | OutputFormat::Jsonl => renderer.write_tree(
            &cli.path,
            tree.render(&cli.path, RenderContext::root()),
            writer,
        ),
    }
    .context("failed to write tree output")?;

    info!(
        directories = stats.directories,
        files = stats.files,
        errors = stats.errors,
        "tree rendered"
    );
    Ok(stats)
}
