//! JSON renderer — structured output for tooling integration.
//!
//! Serializes the whole entity tree, hidden subtrees included; consumers
//! filter on the `hide` flag themselves.

use crate::entity::Entity;
use crate::render::Renderer;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, root: &Entity, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory: {}", dir.display()))?;
        let path = dir.join("api.json");
        let json = serde_json::to_string_pretty(root).context("failed to serialize entity tree")?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))
    }
}
