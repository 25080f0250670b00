//! Optional `ycompose.toml` configuration
//!
//! ```toml
//! [compose]
//! libraries = ["lib/library.yml"]
//! show_plan = false
//! show_diff = false
//! base_dir = "."
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::fs::{self, resolve_relative_to};

pub const CONFIG_FILE: &str = "ycompose.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub compose: ComposeConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeConfig {
    pub libraries: Vec<PathBuf>,
    pub show_plan: bool,
    pub show_diff: bool,
    /// Base for paths shown in previews; the working directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
}

impl ComposeConfig {
    /// Load from an explicit path, or from `ycompose.toml` in `dir` when present.
    ///
    /// An explicit path must exist; the discovered file is optional.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => fs::resolve_in_dir(path, dir),
            None => {
                let discovered = dir.join(CONFIG_FILE);
                if !discovered.exists() {
                    debug!(dir = %dir.display(), "no config file found, using defaults");
                    return Ok(Self::default());
                }
                discovered
            }
        };

        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        parse_config(&content, &path)
    }

    /// Fold command-line options in: extra libraries come after configured ones
    /// and the preview flags can only be switched on.
    pub fn with_overrides(
        mut self,
        libraries: &[PathBuf],
        show_plan: bool,
        show_diff: bool,
        dir: &Path,
    ) -> Self {
        self.libraries
            .extend(libraries.iter().map(|path| fs::resolve_in_dir(path, dir)));
        self.show_plan |= show_plan;
        self.show_diff |= show_diff;
        self
    }
}

/// Parse config content read from `path`, resolving its relative paths
pub fn parse_config(content: &str, path: &Path) -> Result<ComposeConfig> {
    let file: ConfigFile = toml::from_str(content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    let mut config = file.compose;
    for library in &mut config.libraries {
        *library = resolve_relative_to(library, path);
    }
    if let Some(base_dir) = &mut config.base_dir {
        *base_dir = resolve_relative_to(base_dir, path);
    }

    debug!(
        path = %path.display(),
        libraries = config.libraries.len(),
        "loaded config"
    );
    Ok(config)
}
