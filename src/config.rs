//! Project configuration — cxxdoc.yaml.
//!
//! ```yaml
//! title: Example
//! description: An example library.
//! output: docs/api
//! files:
//!   - include/**/*.hpp
//! ```
//!
//! Command-line arguments override the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CANDIDATES: &[&str] = &["cxxdoc.yaml", "cxxdoc.yml"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Heading for the top-level index page.
    pub title: Option<String>,
    /// Introduction paragraph for the top-level index page.
    pub description: Option<String>,
    /// Output directory.
    pub output: Option<PathBuf>,
    /// Input file glob patterns.
    pub files: Vec<String>,
}

impl Config {
    /// Load the configuration. An explicitly named file must exist; the
    /// default candidates are optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_file(path)
                .with_context(|| format!("failed to read config: {}", path.display()));
        }
        for candidate in CANDIDATES {
            let path = Path::new(candidate);
            if path.is_file() {
                return Self::load_file(path)
                    .with_context(|| format!("failed to read config: {}", path.display()));
            }
        }
        Ok(Self::default())
    }

    fn load_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }
}
