//! cxxdoc — generate Markdown API documentation from annotated C++ sources.
//!
//! Two modes:
//!
//! - **stdin mode**: `cxxdoc < header.hpp` prints the root index page
//! - **file mode**: `cxxdoc -o docs/api include/*.hpp`, or with the inputs
//!   and output directory taken from `cxxdoc.yaml`

mod config;
mod entity;
mod groups;
mod parser;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "cxxdoc",
    about = "Generate Markdown documentation from annotated C++ source files"
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, taken from the
    /// config file; with neither, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Configuration file. Defaults to cxxdoc.yaml when present.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Output format: markdown (default), json
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Include @internal entities in the output
    #[arg(long)]
    show_internal: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::Config::load(cli.config.as_deref())?;

    if cli.files.is_empty() && config.files.is_empty() {
        return stdin_mode(&cli, &config);
    }
    file_mode(&cli, &config)
}

/// stdin mode: read one translation unit, print the root page to stdout.
fn stdin_mode(cli: &Cli, config: &config::Config) -> Result<()> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("failed to read stdin")?;

    let mut root = entity::Entity::default();
    let mut parser = parser::Parser::new()?;
    parser.parse(&source, &mut root);
    groups::resolve(&mut root);

    match cli.format.as_str() {
        "markdown" | "md" => {
            let renderer = render::markdown::MarkdownRenderer {
                options: render_options(cli, config),
            };
            print!("{}", renderer.scope_page(&root));
        }
        "json" => {
            let json = serde_json::to_string_pretty(&root)
                .context("failed to serialize entity tree")?;
            println!("{}", json);
        }
        other => anyhow::bail!("unknown format: {}. Use markdown or json", other),
    }
    Ok(())
}

/// file mode: parse every input into one shared tree, write the page tree.
fn file_mode(cli: &Cli, config: &config::Config) -> Result<()> {
    let patterns = if cli.files.is_empty() {
        &config.files
    } else {
        &cli.files
    };
    let output = cli
        .output
        .clone()
        .or_else(|| config.output.clone())
        .context("--output is required when files are given")?;

    fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output directory: {}", output.display()))?;

    let input_files = expand_globs(patterns)?;

    let mut root = entity::Entity::default();
    let mut parser = parser::Parser::new()?;
    for path in &input_files {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        parser.parse(&source, &mut root);
    }
    groups::resolve(&mut root);

    let renderer = render::create_renderer(&cli.format, render_options(cli, config))?;
    renderer.render(&root, &output)
}

fn render_options(cli: &Cli, config: &config::Config) -> render::Options {
    render::Options {
        show_hidden: cli.show_internal,
        title: config.title.clone(),
        description: config.description.clone(),
    }
}

/// File extensions recognized when scanning a bare directory.
const SUPPORTED_EXTENSIONS: &[&str] = &["hpp", "hh", "hxx", "h", "ipp", "cpp", "cc", "cxx"];

/// Expand glob patterns into a sorted, deduplicated list of file paths.
/// Bare directories are scanned (non-recursive) for supported extensions.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() {
                    if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
                        if SUPPORTED_EXTENSIONS.contains(&ext) {
                            files.push(p);
                        }
                    }
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}
