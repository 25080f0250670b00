//! Cycle detection along the current resolution path

use std::path::{Path, PathBuf};

use crate::error::ComposeError;

/// `(library, scenario)` pairs from the tree root to the node being resolved
pub type ResolutionPath = Vec<(PathBuf, String)>;

/// Fail if `scenario` in `library` is already being resolved further up
pub fn check(path: &ResolutionPath, library: &Path, scenario: &str) -> Result<(), ComposeError> {
    let Some(start) = path
        .iter()
        .position(|(lib, name)| lib == library && name == scenario)
    else {
        return Ok(());
    };

    let mut chain: Vec<String> = path[start..].iter().map(|(_, name)| name.clone()).collect();
    chain.push(scenario.to_string());
    Err(ComposeError::CircularDependency { chain })
}
