//! Renderer module — trait-based format dispatch.

pub mod json;
pub mod markdown;

use crate::entity::Entity;
use anyhow::{anyhow, Result};
use std::path::Path;

/// Trait for writing an entity tree in a specific output format.
pub trait Renderer {
    fn render(&self, root: &Entity, dir: &Path) -> Result<()>;
}

/// Knobs shared by renderers.
#[derive(Debug, Default, Clone)]
pub struct Options {
    /// Emit entities marked `@internal`.
    pub show_hidden: bool,
    /// Heading for the top-level index page.
    pub title: Option<String>,
    /// Introduction paragraph for the top-level index page.
    pub description: Option<String>,
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str, options: Options) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer { options })),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use markdown or json", format)),
    }
}
