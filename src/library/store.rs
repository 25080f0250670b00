//! Registry of loaded libraries keyed by absolute path

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::types::Library;
use super::validation::validate;
use crate::error::ComposeError;
use crate::fs;

/// Every library reachable from the requested ones, loaded once each
#[derive(Debug, Default)]
pub struct LibraryStore {
    libraries: HashMap<PathBuf, Library>,
    /// Directly requested libraries, in request order
    top_level: Vec<PathBuf>,
}

impl LibraryStore {
    /// Load libraries relative to the current working directory
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let cwd = fs::working_dir()?;
        Self::load_from(&cwd, paths)
    }

    /// Load libraries with relative paths anchored at `base_dir`
    pub fn load_from<P: AsRef<Path>>(base_dir: &Path, paths: &[P]) -> Result<Self> {
        let mut store = Self::default();
        for path in paths {
            let absolute = fs::resolve_in_dir(path.as_ref(), base_dir);
            store.load_library(&absolute, true)?;
        }
        Ok(store)
    }

    fn load_library(&mut self, path: &Path, top_level: bool) -> Result<()> {
        if top_level && !self.top_level.iter().any(|p| p == path) {
            self.top_level.push(path.to_path_buf());
        }

        if self.libraries.contains_key(path) {
            debug!(path = %path.display(), "library already loaded");
            return Ok(());
        }

        debug!(path = %path.display(), top_level, "loading library");
        let content = fs::read_to_string(path)?;
        let library = parse_library(&content, path)?;
        let references: Vec<PathBuf> = library.libraries.iter().map(|l| l.path.clone()).collect();

        // Registered before its references so a reference back to this file
        // finds it instead of loading it again.
        self.libraries.insert(path.to_path_buf(), library);

        for reference in references {
            self.load_library(&reference, false).with_context(|| {
                format!(
                    "Failed to load library {} referenced from {}",
                    reference.display(),
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    /// Look up a loaded library by absolute path
    pub fn get(&self, path: &Path) -> Result<&Library, ComposeError> {
        self.libraries
            .get(path)
            .ok_or_else(|| ComposeError::LibraryNotLoaded {
                path: path.to_path_buf(),
            })
    }

    /// Directly requested libraries, in request order
    pub fn top_level(&self) -> impl Iterator<Item = &Library> {
        self.top_level
            .iter()
            .filter_map(|path| self.libraries.get(path))
    }

    pub fn is_top_level(&self, path: &Path) -> bool {
        self.top_level.iter().any(|p| p == path)
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

/// Parse library content and rewrite every file reference relative to `path`
pub fn parse_library(content: &str, path: &Path) -> Result<Library> {
    let mut library: Library = serde_yaml::from_str(content)
        .with_context(|| format!("Failed to parse library {}", path.display()))?;

    if let Err(problems) = validate(&library) {
        return Err(ComposeError::InvalidLibrary {
            path: path.to_path_buf(),
            problems,
        }
        .into());
    }

    library.path = path.to_path_buf();

    for reference in &mut library.libraries {
        reference.path = fs::resolve_relative_to(&reference.path, path);
    }

    for scenario in &mut library.scenarios {
        scenario.params.resolve_paths(path);
        scenario.global.resolve_paths(path);
        for snippet in &mut scenario.snippets {
            snippet.path = fs::resolve_relative_to(&snippet.path, path);
            snippet.params.resolve_paths(path);
        }
        for dependency in &mut scenario.scenarios {
            dependency.params.resolve_paths(path);
        }
    }

    Ok(library)
}
